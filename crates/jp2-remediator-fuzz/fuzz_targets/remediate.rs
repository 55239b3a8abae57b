fn main() {
    // Honggfuzz does not support windows yet
    #[cfg(not(target_os = "windows"))]
    {
        use honggfuzz::fuzz;
        loop {
            fuzz!(|data: &[u8]| {
                jp2_remediator_fuzz::fuzz_remediate(data);
            });
        }
    }
}
