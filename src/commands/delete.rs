//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::{Config, Result};

/// Deletes the entry at `args.index()`. Every later entry moves down by one index.
///
/// # Returns
/// The values of the deleted entry.
///
/// # Errors
/// - `Index` if there is no entry at the index, in which case nothing is deleted.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<Vec<String>>> {
    let mut session = config.session()?;
    let removed = session.delete(args.index())?;
    let description = removed.get(0).unwrap_or_default();
    let remaining = session.store().len();
    let message = format!(
        "Deleted entry {} '{}', {} entr{} remaining",
        args.index(),
        description,
        remaining,
        if remaining == 1 { "y" } else { "ies" }
    );
    Ok(Out::new(message, removed.values().to_vec()))
}
