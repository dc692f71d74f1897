//! Build information command

use anyhow::Result;

/// Revision the binary was built from, injected by the release build.
const GIT_SHA: Option<&str> = option_env!("APIDEPS_GIT_SHA");
/// Build timestamp, injected by the release build.
const BUILD_TIME: Option<&str> = option_env!("APIDEPS_BUILD_TIME");

/// Lines printed by `apideps cliversion`
pub fn build_info() -> Vec<String> {
    vec![
        format!("version: {}", env!("CARGO_PKG_VERSION")),
        format!("sha1 version: {}", GIT_SHA.unwrap_or("local build")),
        format!("build time: {}", BUILD_TIME.unwrap_or("unknown")),
    ]
}

pub fn execute() -> Result<()> {
    for line in build_info() {
        println!("{}", line);
    }
    Ok(())
}
