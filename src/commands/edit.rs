use crate::args::{EditArgs, FieldValue};
use crate::commands::Out;
use crate::session::Submitted;
use crate::{Config, Result};

/// Changes the entry at `args.index()`. The entry's current values are loaded into a form, the
/// given fields are applied on top, and the result is validated and written back in place.
///
/// # Errors
/// - `Index` if there is no entry at the index.
/// - `Validation` if the edited entry is invalid. The data file is not changed in that case.
pub async fn edit(config: Config, args: EditArgs) -> Result<Out<Submitted>> {
    let mut session = config.session()?;
    let mut form = session.begin_edit(args.index())?;
    FieldValue::apply_all(args.fields(), &mut form);
    let submitted = session.submit(&form)?;
    let count = args.fields().len();
    let message = format!(
        "Updated {} field{} of entry {}",
        count,
        if count == 1 { "" } else { "s" },
        submitted.index()
    );
    Ok(Out::new(message, submitted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_edit_in_place() {
        let env = TestEnv::new().await;
        env.insert_test_entries(&["Steel Beam", "Cement", "Rebar"]);
        let before = env.records();

        let args = EditArgs::new(1, vec!["Labor=2,500".parse().unwrap()]);
        let out = edit(env.config(), args).await.unwrap();
        assert_eq!(out.structure(), Some(&Submitted::Replaced(1)));
        assert_eq!(out.message(), "Updated 1 field of entry 1");

        let after = env.records();
        assert_eq!(after.len(), 3);
        assert_eq!(after.get(0).unwrap().values(), before.get(0).unwrap().values());
        assert_eq!(after.get(2).unwrap().values(), before.get(2).unwrap().values());
        let edited = after.get(1).unwrap();
        assert_eq!(edited.get(0), Some("Cement"));
        assert_eq!(edited.get(3), Some("10.00"));
        assert_eq!(edited.get(4), Some("2,500.00"));
        assert_eq!(edited.get(6), Some("2,510.00"));
    }

    #[tokio::test]
    async fn test_edit_out_of_range() {
        let env = TestEnv::new().await;
        env.insert_test_entries(&["Steel Beam"]);
        let e = edit(env.config(), EditArgs::new(1, Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Index);
    }

    #[tokio::test]
    async fn test_edit_invalid_leaves_file() {
        let env = TestEnv::new().await;
        env.insert_test_entries(&["Steel Beam"]);
        let before = env.records();
        let args = EditArgs::new(0, vec!["Item Description= ".parse().unwrap()]);
        let e = edit(env.config(), args).await.unwrap_err();
        assert!(e.is_validation());
        assert_eq!(env.records().get(0).unwrap().values(), before.get(0).unwrap().values());
    }
}
