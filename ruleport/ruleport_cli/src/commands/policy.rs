//! Rule write commands
//!
//! Each command maps onto one adapter call.

use clap::Args;
use ruleport_adapter::DocumentAdapter;
use ruleport_docstore::DocumentStore;
use ruleport_policy::Adapter;

use super::section_of;

/// Arguments for the add command
#[derive(Args)]
pub struct AddArgs {
    /// Rule type, e.g. `p` or `g`
    pub ptype: String,

    /// Rule values in order
    #[clap(required = true)]
    pub values: Vec<String>,
}

/// Arguments for the remove command
#[derive(Args)]
pub struct RemoveArgs {
    /// Rule type
    pub ptype: String,

    /// Rule values in order
    #[clap(required = true)]
    pub values: Vec<String>,
}

/// Arguments for the remove-filtered command
#[derive(Args)]
pub struct RemoveFilteredArgs {
    /// Rule type
    pub ptype: String,

    /// Slot matched by the first value
    #[clap(allow_negative_numbers = true)]
    pub field_index: isize,

    /// Values for consecutive slots, "" leaves a slot unconstrained
    pub values: Vec<String>,
}

/// Arguments for the remove-type command
#[derive(Args)]
pub struct RemoveTypeArgs {
    /// Rule type
    pub ptype: String,
}

/// Implementation of the add command
pub fn execute_add<S: DocumentStore>(
    adapter: &DocumentAdapter<S>,
    args: &AddArgs,
) -> anyhow::Result<()> {
    let sec = section_of(&args.ptype)?;
    adapter.add_policy(sec, &args.ptype, &args.values)?;
    println!("added {}, {}", args.ptype, args.values.join(", "));
    Ok(())
}

/// Implementation of the remove command
pub fn execute_remove<S: DocumentStore>(
    adapter: &DocumentAdapter<S>,
    args: &RemoveArgs,
) -> anyhow::Result<()> {
    let sec = section_of(&args.ptype)?;
    adapter.remove_policy(sec, &args.ptype, &args.values)?;
    println!("removed {}, {}", args.ptype, args.values.join(", "));
    Ok(())
}

/// Implementation of the remove-filtered command
pub fn execute_remove_filtered<S: DocumentStore>(
    adapter: &DocumentAdapter<S>,
    args: &RemoveFilteredArgs,
) -> anyhow::Result<()> {
    let sec = section_of(&args.ptype)?;
    adapter.remove_filtered_policy(sec, &args.ptype, args.field_index, &args.values)?;
    println!("removed matching {} rules", args.ptype);
    Ok(())
}

/// Implementation of the remove-type command
pub fn execute_remove_type<S: DocumentStore>(
    adapter: &DocumentAdapter<S>,
    args: &RemoveTypeArgs,
) -> anyhow::Result<()> {
    let sec = section_of(&args.ptype)?;
    adapter.remove_policies(sec, &args.ptype, &[])?;
    println!("removed all {} rules", args.ptype);
    Ok(())
}
