pub mod load;
pub mod merge;
pub mod resolve;
pub mod version;

use bootconf_core::version::OUTPUT_SCHEMA_VERSION;

/// Report a failed command and exit with status 1.
///
/// With `--json`, prints `{"ok": false, "error": {"code", "message"}}` to stdout.
pub(crate) fn fail(err: &bootconf_core::Error, json: bool) -> ! {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "schema_version": OUTPUT_SCHEMA_VERSION,
                "error": {
                    "code": err.code(),
                    "message": err.to_string()
                }
            })
        );
    } else {
        eprintln!("error: {err}");
    }
    std::process::exit(1);
}
