//! The orchestration table — the ordered list of provisioning steps.

/// What a step does. Dispatched by a `StepExecutor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Preflight,
    CollectSecrets,
    PrepareConfig,
    InstallPackages,
    InstallContainerEngine,
    GenerateArtifacts,
    BuildImage,
    LaunchCompose,
    RegisterServices,
    Verify,
    ConfigureKiosk,
    ValidateApiKeys,
}

/// One named, ordered unit of orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    pub kind: StepKind,
    /// A fatal step's failure aborts the run; a non-fatal one only warns.
    pub fatal: bool,
}

impl Step {
    #[must_use]
    pub const fn fatal(name: &'static str, kind: StepKind) -> Self {
        Self {
            name,
            kind,
            fatal: true,
        }
    }

    #[must_use]
    pub const fn non_fatal(name: &'static str, kind: StepKind) -> Self {
        Self {
            name,
            kind,
            fatal: false,
        }
    }
}

/// Stages every run executes, in order.
pub const CORE_STEPS: &[Step] = &[
    Step::fatal("preflight checks", StepKind::Preflight),
    Step::fatal("API key collection", StepKind::CollectSecrets),
    Step::fatal("application config", StepKind::PrepareConfig),
    Step::fatal("system packages", StepKind::InstallPackages),
    Step::fatal("container engine", StepKind::InstallContainerEngine),
    Step::fatal("build artifacts", StepKind::GenerateArtifacts),
    Step::fatal("image build", StepKind::BuildImage),
    Step::fatal("compose launch", StepKind::LaunchCompose),
    Step::fatal("service registration", StepKind::RegisterServices),
    Step::fatal("verification", StepKind::Verify),
];

/// Optional trailing stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanOptions {
    pub kiosk: bool,
    pub validate_keys: bool,
}

/// Build the step table for a run.
#[must_use]
pub fn orchestration_table(opts: PlanOptions) -> Vec<Step> {
    let mut steps = CORE_STEPS.to_vec();
    if opts.kiosk {
        steps.push(Step::fatal("kiosk display", StepKind::ConfigureKiosk));
    }
    if opts.validate_keys {
        steps.push(Step::non_fatal("API key validation", StepKind::ValidateApiKeys));
    }
    steps
}
