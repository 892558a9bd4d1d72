fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    auditlog_ui::mount();
}
