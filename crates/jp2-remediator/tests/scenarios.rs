use jp2_remediator::fixture::{self, Curve};
use jp2_remediator::{
    BoxTreeLocator, ConformanceCheck, HeaderLookup, OutputDecision, PatchResult, Remediator,
    StructuralValidator, TrcChannel,
};
use tracing::Span;

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes(buf[offset..offset + 4].try_into().unwrap())
}

fn written(decision: &OutputDecision) -> &[u8] {
    decision.contents().expect("expected output to be written")
}

#[test]
fn mismatched_size_is_patched() {
    let original = fixture::scenario(20);
    let remediation = Remediator::new().remediate(&original, &Span::none());
    let report = &remediation.report;

    assert_eq!(report.header.offset(), Some(111));
    assert_eq!(
        report.result(TrcChannel::Red),
        PatchResult::SizePatched { old: 20, new: 14 }
    );
    assert_eq!(report.result(TrcChannel::Green), PatchResult::NotFound);
    assert_eq!(report.result(TrcChannel::Blue), PatchResult::NotFound);

    let output = written(&remediation.decision);
    assert_eq!(output.len(), original.len());
    assert_eq!(read_u32(output, fixture::SCENARIO_TAG_POSITION + 8), 14);

    // only the size field changed
    let diff = original
        .iter()
        .zip(output)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();
    assert!(diff
        .iter()
        .all(|&idx| (fixture::SCENARIO_TAG_POSITION + 8..fixture::SCENARIO_TAG_POSITION + 12)
            .contains(&idx)));
}

#[test]
fn matching_size_is_no_change() {
    let original = fixture::scenario(14);
    let remediation = Remediator::new().remediate(&original, &Span::none());
    assert_eq!(remediation.report.result(TrcChannel::Red), PatchResult::SizeMatched);
    assert_eq!(remediation.decision, OutputDecision::NoChange);
}

#[test]
fn unrecognized_method_skips_all_tags() {
    let profile = fixture::icc_profile(&[
        Curve::declared(b"rTRC", 256, 20),
        Curve::declared(b"gTRC", 256, 20),
        Curve::declared(b"bTRC", 256, 20),
    ]);
    let mut original = fixture::jp2_file(2, &profile);
    let colr = original.windows(4).position(|w| w == b"colr").unwrap();
    original[colr + 4] = 5;

    let remediation = Remediator::new().remediate(&original, &Span::none());
    assert!(matches!(
        remediation.report.header,
        HeaderLookup::UnrecognizedMethod(colr) if colr.method == 5
    ));
    for tag in &remediation.report.tags {
        assert_eq!(tag.result, PatchResult::HeaderUnavailable);
    }
    assert_eq!(remediation.decision, OutputDecision::NoChange);
}

#[test]
fn scenario_with_method_five() {
    let mut original = fixture::scenario(20);
    original[104] = 5;
    let remediation = Remediator::new().remediate(&original, &Span::none());
    assert_eq!(
        remediation.report.result(TrcChannel::Red),
        PatchResult::HeaderUnavailable
    );
    assert_eq!(remediation.decision, OutputDecision::NoChange);
}

#[test]
fn all_channels_patched_in_jp2() {
    for method in [1, 2] {
        let profile = fixture::icc_profile(&[
            Curve::declared(b"rTRC", 256, 20),
            Curve::declared(b"gTRC", 1, 0x0100_0000),
            Curve::correct(b"bTRC", 1024),
        ]);
        let original = fixture::jp2_file(method, &profile);
        let remediation = Remediator::new().remediate(&original, &Span::none());

        let results = remediation.report.tags.clone().map(|tag| tag.result);
        assert_eq!(
            results,
            [
                PatchResult::SizePatched { old: 20, new: 524 },
                PatchResult::SizePatched {
                    old: 0x0100_0000,
                    new: 14
                },
                PatchResult::SizeMatched,
            ],
            "method {method}"
        );

        let output = written(&remediation.decision);
        for tag in &remediation.report.tags {
            let position = tag.position.unwrap();
            let curve = tag.curve.unwrap();
            assert!(curve.has_curve_signature());
            assert_eq!(
                read_u32(output, position + 8) as u64,
                curve.point_count as u64 * 2 + 12
            );
        }
    }
}

#[test]
fn second_run_is_no_change() {
    let profile = fixture::icc_profile(&[
        Curve::declared(b"rTRC", 4096, 12),
        Curve::declared(b"gTRC", 4096, 12),
        Curve::correct(b"bTRC", 4096),
    ]);
    let original = fixture::jp2_file(2, &profile);
    let remediator = Remediator::new();

    let first = remediator.remediate(&original, &Span::none());
    let output = written(&first.decision).to_vec();
    assert_eq!(first.report.patched_count(), 2);

    let second = remediator.remediate(&output, &Span::none());
    assert_eq!(second.decision, OutputDecision::NoChange);
    assert_eq!(second.report.patched_count(), 0);
}

#[test]
fn already_correct_file_is_untouched() {
    let profile = fixture::icc_profile(&[
        Curve::correct(b"rTRC", 2),
        Curve::correct(b"gTRC", 2),
        Curve::correct(b"bTRC", 2),
    ]);
    let original = fixture::jp2_file(2, &profile);
    let remediation = Remediator::new().remediate(&original, &Span::none());
    assert!(remediation
        .report
        .tags
        .iter()
        .all(|tag| tag.result == PatchResult::SizeMatched));
    assert_eq!(remediation.decision, OutputDecision::NoChange);
}

#[test]
fn truncated_tag_does_not_affect_others() {
    let profile = fixture::icc_profile(&[
        Curve::declared(b"rTRC", 16, 20),
        Curve::declared(b"gTRC", 16, 20),
    ]);
    let mut original = fixture::jp2_file(2, &profile);
    // A bTRC signature in the last bytes of the file, too close to the end for a full entry
    let len = original.len();
    original[len - 6..len - 2].copy_from_slice(b"bTRC");

    let remediation = Remediator::new().remediate(&original, &Span::none());
    let report = &remediation.report;
    assert_eq!(
        report.result(TrcChannel::Red),
        PatchResult::SizePatched { old: 20, new: 44 }
    );
    assert_eq!(
        report.result(TrcChannel::Green),
        PatchResult::SizePatched { old: 20, new: 44 }
    );
    assert_eq!(report.result(TrcChannel::Blue), PatchResult::EntryIncomplete);
    assert_eq!(written(&remediation.decision).len(), original.len());
}

#[test]
fn curve_out_of_bounds_does_not_affect_others() {
    let profile = fixture::icc_profile(&[
        Curve::declared(b"rTRC", 16, 20),
        Curve::declared(b"gTRC", 16, 20),
        Curve::declared(b"bTRC", 16, 20),
    ]);
    let mut original = fixture::jp2_file(2, &profile);
    let tag = original.windows(4).position(|w| w == b"gTRC").unwrap();
    original[tag + 4..tag + 8].copy_from_slice(&0x7fff_0000u32.to_be_bytes());

    let remediation = Remediator::new().remediate(&original, &Span::none());
    let report = &remediation.report;
    assert!(report.result(TrcChannel::Red).is_patched());
    assert_eq!(report.result(TrcChannel::Green), PatchResult::CurveIncomplete);
    assert!(report.result(TrcChannel::Blue).is_patched());
}

#[test]
fn missing_colr_skips_everything() {
    let profile = fixture::icc_profile(&[Curve::declared(b"rTRC", 16, 20)]);
    let mut original = fixture::jp2_file(2, &profile);
    let colr = original.windows(4).position(|w| w == b"colr").unwrap();
    original[colr..colr + 4].copy_from_slice(b"xxxx");

    let remediation = Remediator::new().remediate(&original, &Span::none());
    assert_eq!(remediation.report.header, HeaderLookup::ColourSpecAbsent);
    assert_eq!(
        remediation.report.result(TrcChannel::Red),
        PatchResult::HeaderUnavailable
    );
    assert_eq!(remediation.decision, OutputDecision::NoChange);
}

#[test]
fn structured_locator_skips_decoy_signatures() {
    let profile = fixture::icc_profile(&[
        Curve::declared(b"rTRC", 16, 20),
        Curve::declared(b"gTRC", 16, 20),
        Curve::declared(b"bTRC", 16, 20),
    ]);
    let mut original = fixture::jp2_file(2, &profile);
    // An XML box placed before the header, containing the signatures as plain text
    let decoy = fixture::make_box(b"xml ", b"<x>colr rTRC gTRC bTRC</x>");
    let insert_at = 12 + 20;
    original.splice(insert_at..insert_at, decoy);

    let searched = Remediator::new().remediate(&original, &Span::none());
    assert!(searched
        .report
        .tags
        .iter()
        .all(|tag| !tag.result.is_patched()));

    let structured =
        Remediator::with_locator(BoxTreeLocator).remediate(&original, &Span::none());
    assert_eq!(structured.report.patched_count(), 3);
    assert!(StructuralValidator::default().is_valid(&original, &Span::none()));
    assert!(StructuralValidator::default()
        .is_valid(written(&structured.decision), &Span::none()));
}
