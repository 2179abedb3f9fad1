use std::sync::Arc;
use whisker_core::{CatImageJudge, RecognitionService};

pub type AppState = Arc<ApiState>;

pub struct ApiState {
    pub recognition: RecognitionService,
    pub judge: CatImageJudge,
}

impl ApiState {
    pub fn new(recognition: RecognitionService, judge: CatImageJudge) -> Self {
        Self { recognition, judge }
    }
}
