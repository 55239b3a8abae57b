use jp2_remediator::{
    BoxTreeLocator, ConformanceCheck, Remediation, Remediator, StructuralValidator,
    ValidationFormat, ValidatorOptions,
};
use tracing::Span;

fn check_length(data: &[u8], remediation: &Remediation) {
    if let Some(contents) = remediation.decision.contents() {
        assert_eq!(contents.len(), data.len(), "output length differs from input");
    }
}

/// Runs every locator and validator configuration on `data`.
///
/// Panics if anything panics, or if remediated output differs in length from the input.
pub fn fuzz_remediate(data: &[u8]) {
    let span = Span::none();
    for format in [ValidationFormat::Jp2, ValidationFormat::J2c] {
        let validator = StructuralValidator::new(ValidatorOptions {
            format,
            ..Default::default()
        });
        let _ = validator.is_valid(data, &span);
    }

    check_length(data, &Remediator::new().remediate(data, &span));
    check_length(
        data,
        &Remediator::with_locator(BoxTreeLocator).remediate(data, &span),
    );
}
