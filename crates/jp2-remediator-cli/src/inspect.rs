use jp2_remediator::{
    ConformanceCheck, OutputDecision, Remediation, Remediator, StructuralValidator, TagOutcome,
};

use crate::batch::Locator;
use crate::commands::inspect::*;
use crate::{Error, Result};

pub fn handle_inspect(args: InspectArgs) -> Result<()> {
    let _guard = tracing::trace_span!("Handle inspect subcommand").entered();
    let span = tracing::debug_span!("Inspect file", input = %args.input.display());

    let original = std::fs::read(&args.input).map_err(|source| Error::ReadInput {
        path: args.input.clone(),
        source,
    })?;
    let validator = StructuralValidator::new(args.validator.options());
    let valid = validator.is_valid(&original, &span);
    let remediator = Remediator::with_locator(Locator::from(args.locator));
    let remediation = remediator.remediate(&original, &span);

    println!("JP2 file ({} bytes)", original.len());
    println!("  Structural check: {}", if valid { "passed" } else { "failed" });
    print!("{}", describe(&remediation));
    Ok(())
}

fn describe_tag(tag: &TagOutcome) -> String {
    let mut out = format!("  {}: {}\n", tag.channel, tag.result);
    if let (Some(position), Some(entry)) = (tag.position, tag.entry) {
        out += &format!(
            "    Entry at {position}: offset {}, declared size {}\n",
            entry.offset, entry.declared_size
        );
    }
    if let Some(curve) = tag.curve {
        out += &format!(
            "    Curve '{}': {} points, expected size {}\n",
            curve.signature.escape_ascii(),
            curve.point_count,
            curve.expected_size()
        );
    }
    out
}

fn describe(remediation: &Remediation) -> String {
    let report = &remediation.report;
    let mut out = format!("  Colour specification: {}\n", report.header);
    for tag in &report.tags {
        out += &describe_tag(tag);
    }
    match &remediation.decision {
        OutputDecision::NoChange => out += "  No changes needed\n",
        OutputDecision::Write(_) => {
            out += &format!(
                "  Remediation would patch {} tag(s)\n",
                report.patched_count()
            );
        }
    }
    out
}
