//! Java runtime dependency.

use super::Provisioner;
use crate::config::InterpolationContext;
use crate::error::Result;
use crate::requirements::{DependencySpec, InstallError};

/// Dependency name, also the executable probed on the search path.
pub const RUNTIME: &str = "java";

/// Build the runtime spec: search path first, then the known installation roots.
pub fn spec<'a>(provisioner: &'a Provisioner<'a>) -> Result<DependencySpec<'a>> {
    let config = provisioner.config();
    let required = config.required_runtime_version()?;
    let min_version = required.clone();

    let spec = DependencySpec::new(
        RUNTIME,
        required,
        move |_| {
            provisioner.locator().find_sufficient(
                RUNTIME,
                &provisioner.config().runtime.search_roots,
                &min_version,
            )
        },
        move |_| install(provisioner),
    )
    .with_hint(config.runtime.manual_install_hint.clone())
    .with_executable();

    Ok(spec)
}

fn install(provisioner: &Provisioner<'_>) -> std::result::Result<(), InstallError> {
    let runtime = &provisioner.config().runtime;
    let installer = provisioner.download_to_temp(&runtime.installer_url)?;
    let context = InterpolationContext::new().with_path("installer", &installer);
    provisioner.run_installer(&runtime.install_command, &context)
}
