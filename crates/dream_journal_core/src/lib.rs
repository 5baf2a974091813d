pub mod card;
pub mod domain;
pub mod ports;
pub mod pricing;
pub mod prompts;
pub mod statistics;
pub mod styles;
pub mod tags;
pub mod validation;

pub use card::CardDesign;
pub use domain::{
    AnalysisOptions, AnalysisOutcome, DateRange, DreamAnalysis, DreamEntry, DreamEntryPatch,
    GeneratedImage, ImageRequest, JournalPromptResponse, NewDreamEntry, NewPromptResponse,
    Transcription,
};
pub use ports::{
    DatabaseService, DreamAnalysisService, ImageGenerationService, PortError, PortResult,
    SpeechToTextService,
};
pub use prompts::{select_follow_up_prompts, PromptCategory};
pub use statistics::{compute_statistics, LabelCount, StatisticsReport};
pub use styles::{ArtStyle, ImageQuality};
pub use validation::{Rating, ValidationError};
