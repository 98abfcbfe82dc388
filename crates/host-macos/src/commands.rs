use mbedls_core::AcquisitionError;
use std::path::Path;
use std::process::Command;

pub const IOREG_ARGS: &[&str] = &["-a", "-t", "-l", "-r", "-c", "IOSerialBSDClient"];
pub const SYSTEM_PROFILER_ARGS: &[&str] = &["SPUSBDataType", "-detailLevel", "full", "-xml"];
pub const DISKUTIL_ARGS: &[&str] = &["list", "-plist"];

/// Runs a tool to completion and returns its stdout.
pub fn run_tool(program: &Path, args: &[&str]) -> Result<Vec<u8>, AcquisitionError> {
    let tool = program.display().to_string();
    log::debug!("running {tool} {}", args.join(" "));
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| AcquisitionError::Spawn {
            tool: tool.clone(),
            source,
        })?;
    if !output.status.success() {
        return Err(AcquisitionError::ToolFailed {
            tool,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}
