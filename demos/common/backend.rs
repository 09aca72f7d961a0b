/// Backend used to (de)serialize scheduler records.
///
/// Scheduler records hold no tensors, so the cpu backend is enough.
pub type MainBackend = burn::backend::NdArray<f32, i32>;

pub type RecorderTy = burn::record::CompactRecorder;
