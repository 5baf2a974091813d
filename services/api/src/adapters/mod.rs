pub mod analysis_llm;
pub mod db;
pub mod image_gen;
pub mod sst;

pub use analysis_llm::OpenAiAnalysisAdapter;
pub use db::DbAdapter;
pub use image_gen::OpenAiImageAdapter;
pub use sst::OpenAiSstAdapter;
