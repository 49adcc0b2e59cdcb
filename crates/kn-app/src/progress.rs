#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingConfiguration,
    LoadingCheckpoint,
    Compiling,
    InitializingMesh,
    Running,
    Completed,
    Stopped,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProgress {
    pub sim_time: f64,
    pub final_time: f64,
    pub fraction_complete: f64,
    pub iteration: u64,
    pub num_blocks: usize,
    pub num_zones: usize,
    pub mzps: f64,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub progress: Option<RunProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            progress: None,
        }
    }
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::LoadingConfiguration => "loading configuration",
            RunStage::LoadingCheckpoint => "loading checkpoint",
            RunStage::Compiling => "compiling",
            RunStage::InitializingMesh => "initializing mesh",
            RunStage::Running => "running",
            RunStage::Completed => "completed",
            RunStage::Stopped => "stopped",
        }
    }
}
