use crate::args::{AddArgs, FieldValue};
use crate::commands::Out;
use crate::model::EntryForm;
use crate::session::Submitted;
use crate::{Config, Result};

/// Validates the given fields as a new entry and appends it to the data file.
///
/// Blank cost fields count as zero and the total is always computed. A blank date becomes today
/// and a blank "Logged By" becomes the configured name.
///
/// # Errors
/// - `Validation` if the description is blank, a cost is not numeric or a header is unknown.
///   The data file is not changed in that case.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Submitted>> {
    let mut session = config.session()?;
    let mut form = EntryForm::new();
    FieldValue::apply_all(args.fields(), &mut form);
    let submitted = session.submit(&form)?;
    let message = format!("Added entry {}", submitted.index());
    Ok(Out::new(message, submitted))
}
