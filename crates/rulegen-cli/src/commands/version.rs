use miette::{IntoDiagnostic, Result};
use rulegen_core::version::VersionInfo;

pub fn run(json: bool) -> Result<()> {
    let info = VersionInfo::current();
    if json {
        let mut value = serde_json::to_value(info).into_diagnostic()?;
        value["ok"] = serde_json::Value::Bool(true);
        println!("{value}");
    } else {
        println!("{info}");
    }
    Ok(())
}
