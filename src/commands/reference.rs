use crate::args::{RefAction, RefArgs};
use crate::commands::Out;
use crate::{Config, Result};
use std::path::PathBuf;

/// Shows, sets or clears the reference file path of an entry. Setting a path that does not exist
/// logs a warning but still stores it.
///
/// # Returns
/// The reference path of the entry after the action, if any.
///
/// # Errors
/// - `Validation` if the schema has no "Reference File" column.
/// - `Index` if there is no entry at the index.
pub async fn reference(config: Config, args: RefArgs) -> Result<Out<Option<PathBuf>>> {
    let mut session = config.session()?;
    match args.action() {
        RefAction::Show { index } => {
            let path = session.reference(*index)?;
            let message = match &path {
                Some(p) => format!("Entry {index} references {}", p.display()),
                None => format!("Entry {index} has no reference file"),
            };
            Ok(Out::new(message, path))
        }
        RefAction::Set { index, path } => {
            session.set_reference(*index, path)?;
            let message = format!("Entry {index} now references {}", path.display());
            Ok(Out::new(message, Some(path.clone())))
        }
        RefAction::Clear { index } => {
            session.clear_reference(*index)?;
            Ok(Out::new(
                format!("Cleared the reference file of entry {index}"),
                None,
            ))
        }
    }
}
