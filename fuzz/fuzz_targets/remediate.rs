#![no_main]

libfuzzer_sys::fuzz_target!(|data: &[u8]| {
    jp2_remediator_fuzz::fuzz_remediate(data);
});
