//! Reading the label/input pair and checking their association

use crate::browser::PageAccess;
use crate::error::Result;
use probe_core::{InputAttributes, LabelAttributes, Verdict};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Association attribute on a label
pub const LABEL_FOR_ATTRIBUTE: &str = "for";
/// Identity attribute on a form control
pub const INPUT_ID_ATTRIBUTE: &str = "id";

/// Attributes of the first label/input pair and their verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationCheck {
    pub label: LabelAttributes,
    pub input: InputAttributes,
    pub verdict: Verdict,
}

impl AssociationCheck {
    pub fn new(label: LabelAttributes, input: InputAttributes) -> Self {
        let verdict = Verdict::evaluate(&label, &input);
        Self {
            label,
            input,
            verdict,
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict.is_success()
    }
}

/// Read `for` from the first element matching `selector`
pub async fn read_label_attributes<P: PageAccess + ?Sized>(
    page: &P,
    selector: &str,
) -> Result<LabelAttributes> {
    let for_value = page
        .first_attribute(selector, LABEL_FOR_ATTRIBUTE)
        .await?;
    debug!("Label '{}' for={:?}", selector, for_value);
    Ok(LabelAttributes { for_value })
}

/// Read `id` from the first element matching `selector`
pub async fn read_input_attributes<P: PageAccess + ?Sized>(
    page: &P,
    selector: &str,
) -> Result<InputAttributes> {
    let id_value = page
        .first_attribute(selector, INPUT_ID_ATTRIBUTE)
        .await?;
    debug!("Input '{}' id={:?}", selector, id_value);
    Ok(InputAttributes { id_value })
}

/// Read both elements and evaluate the association
///
/// A mismatch is returned as a failed check, not as an error.
pub async fn verify_association<P: PageAccess + ?Sized>(
    page: &P,
    label_selector: &str,
    input_selector: &str,
) -> Result<AssociationCheck> {
    let label = read_label_attributes(page, label_selector).await?;
    let input = read_input_attributes(page, input_selector).await?;

    let check = AssociationCheck::new(label, input);
    if check.passed() {
        info!("Association verified for {} -> {}", label_selector, input_selector);
    } else {
        info!(
            "Association check failed: for={:?}, id={:?}",
            check.label.for_value, check.input.id_value
        );
    }

    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::MockPage;
    use probe_core::ProbeError;

    #[tokio::test]
    async fn test_verify_association_reads_first_pair() {
        let page = MockPage::default()
            .with_element("label", &[("for", "email"), ("class", "text-sm")])
            .with_element("input", &[("id", "email"), ("type", "email")]);

        let check = verify_association(&page, "label", "input").await.unwrap();
        assert!(check.passed());
        assert_eq!(page.events(), vec!["read label[for]", "read input[id]"]);
    }

    #[tokio::test]
    async fn test_absent_attribute_is_none() {
        let page = MockPage::default()
            .with_element("label", &[])
            .with_element("input", &[("id", "email")]);

        let label = read_label_attributes(&page, "label").await.unwrap();
        assert_eq!(label.for_value, None);
    }

    #[tokio::test]
    async fn test_missing_element_is_error() {
        let page = MockPage::default().with_element("input", &[("id", "email")]);

        let err = verify_association(&page, "label", "input").await.unwrap_err();
        assert!(matches!(err, ProbeError::MissingElement { ref selector } if selector == "label"));
    }

    #[test]
    fn test_association_check_passes() {
        let check = AssociationCheck::new(
            LabelAttributes {
                for_value: Some("email".to_string()),
            },
            InputAttributes {
                id_value: Some("email".to_string()),
            },
        );
        assert!(check.passed());
        assert_eq!(check.verdict, Verdict::Success);
    }

    #[test]
    fn test_association_check_fails_without_for() {
        let check = AssociationCheck::new(
            LabelAttributes::default(),
            InputAttributes {
                id_value: Some("email".to_string()),
            },
        );
        assert!(!check.passed());
    }
}
