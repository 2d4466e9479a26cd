//! Command implementations.

pub mod audit;
pub mod cascade;
pub mod evidence;
pub mod export;
pub mod order;
pub mod propagate;
pub mod show;
pub mod validate;

pub use self::audit::execute_audit;
pub use self::cascade::execute_cascade;
pub use self::evidence::execute_evidence;
pub use self::export::execute_export;
pub use self::order::execute_order;
pub use self::propagate::execute_propagate;
pub use self::show::execute_show;
pub use self::validate::execute_validate;

use crate::cli::NetworkArgs;
use crate::error::{CliError, Result};
use crate::network::load_network;
use hben_domain::{EntailmentDag, Node};

/// Load the network named by `args`, applying its preset if any.
pub(crate) fn load(args: &NetworkArgs) -> Result<EntailmentDag> {
    load_network(&args.network, args.preset.map(Into::into))
}

/// Look up a node, failing with `UnknownNode`.
pub(crate) fn require_node<'a>(dag: &'a EntailmentDag, name: &str) -> Result<&'a Node> {
    dag.node(name)
        .ok_or_else(|| CliError::UnknownNode(name.to_string()))
}
