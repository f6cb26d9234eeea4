//! Bulk and read commands
//!
//! These commands need a model to load rules into. It comes from `--model`
//! or falls back to the basic RBAC model.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use ruleport_adapter::DocumentAdapter;
use ruleport_docstore::DocumentStore;
use ruleport_policy::model::RULE_SECTIONS;
use ruleport_policy::{load_policy_line, Adapter, Model, BASIC_RBAC_MODEL};

/// Arguments for the import command
#[derive(Args)]
pub struct ImportArgs {
    /// Policy file, one rule per line (`p, alice, data1, read`)
    pub file: PathBuf,
}

/// Arguments for the list command
#[derive(Args)]
pub struct ListArgs {
    /// Only rules of this type
    #[clap(long)]
    pub ptype: Option<String>,

    /// Only rules whose stored field equals a value, as `FIELD=VALUE`
    #[clap(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {:?}", s))?;
    Ok((field.to_string(), value.to_string()))
}

/// Build the model from a definition file or the built-in RBAC model.
fn load_model(path: Option<&Path>) -> anyhow::Result<Model> {
    let model = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read model {}", path.display()))?;
            Model::from_text(&text)?
        }
        None => Model::from_text(BASIC_RBAC_MODEL)?,
    };
    Ok(model)
}

/// Every rule of the model as a policy line, in section then type order.
fn policy_lines(model: &Model) -> Vec<String> {
    let mut lines = Vec::new();
    for sec in RULE_SECTIONS {
        let Some(section) = model.section(sec) else {
            continue;
        };
        for (ptype, assertion) in section {
            for rule in &assertion.policy {
                let mut line = ptype.clone();
                for value in rule {
                    line.push_str(", ");
                    line.push_str(value);
                }
                lines.push(line);
            }
        }
    }
    lines
}

/// Implementation of the import command
pub fn execute_import<S: DocumentStore>(
    adapter: &DocumentAdapter<S>,
    model_path: Option<&Path>,
    args: &ImportArgs,
) -> anyhow::Result<()> {
    let mut model = load_model(model_path)?;
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read policy {}", args.file.display()))?;

    for (number, line) in text.lines().enumerate() {
        load_policy_line(line, &mut model)
            .with_context(|| format!("{}:{}", args.file.display(), number + 1))?;
    }

    adapter.save_policy(&model)?;
    println!(
        "imported {} rules into {}",
        model.policy_count(),
        adapter.collection()
    );
    Ok(())
}

/// Implementation of the list command
pub fn execute_list<S: DocumentStore>(
    adapter: &mut DocumentAdapter<S>,
    model_path: Option<&Path>,
    args: &ListArgs,
) -> anyhow::Result<()> {
    let mut model = load_model(model_path)?;

    if args.ptype.is_none() && args.fields.is_empty() {
        adapter.load_policy(&mut model)?;
    } else {
        let mut filter = adapter.query();
        if let Some(ptype) = &args.ptype {
            filter = filter.ptype(ptype);
        }
        for (field, value) in &args.fields {
            filter = filter.where_eq(field, value);
        }
        adapter.load_filtered_policy(&mut model, Some(filter))?;
    }

    for line in policy_lines(&model) {
        println!("{}", line);
    }
    Ok(())
}

/// Implementation of the count command
pub fn execute_count<S: DocumentStore>(
    adapter: &mut DocumentAdapter<S>,
    model_path: Option<&Path>,
) -> anyhow::Result<()> {
    let mut model = load_model(model_path)?;
    adapter.load_policy(&mut model)?;
    println!("{}", model.policy_count());
    Ok(())
}
