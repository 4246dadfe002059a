pub mod client;
pub mod commands;
pub mod interceptor;
pub mod materials;

pub use client::{ApiClient, ApiResponse};
pub use commands::{CommandList, CommandListParams, CommandPayload, CommandRecord, CommandsApi};
pub use interceptor::{AuthPlaceholder, RequestInterceptor};
pub use materials::{
    MaterialForm, MaterialList, MaterialMeta, MaterialUploadResponse, MaterialsApi, ProgressCallback,
    UploadOptions, UploadProgress,
};
