use serde_json::Value;

use super::environment_path;
use crate::client::ArcaneClient;
use crate::error::ClientError;
use crate::stream::TextStream;
use crate::types::{
    ApiResponse, ImageCounts, ImageDetails, ImagePruneReport, ImageSummary, PaginationParams,
    PullImageOptions,
};

/// `/api/environments/{env}/images`
#[derive(Debug, Clone, Copy)]
pub struct ImagesApi<'a> {
    client: &'a ArcaneClient,
}

impl<'a> ImagesApi<'a> {
    pub fn new(client: &'a ArcaneClient) -> Self {
        Self { client }
    }

    pub fn list(&self, environment_id: &str, params: &PaginationParams) -> Result<Vec<ImageSummary>, ClientError> {
        let resp: ApiResponse<Vec<ImageSummary>> = self
            .client
            .get_with_params(&environment_path(environment_id, "images"), params)?;
        Ok(resp.data)
    }

    pub fn get(&self, environment_id: &str, image_id: &str) -> Result<ImageDetails, ClientError> {
        let resp: ApiResponse<ImageDetails> = self
            .client
            .get(&environment_path(environment_id, &format!("images/{image_id}")))?;
        Ok(resp.data)
    }

    /// Start a pull and stream the server's progress output.
    ///
    /// The server writes newline-delimited JSON progress events; chunks are
    /// passed through as text without parsing.
    pub fn pull(&self, environment_id: &str, options: &PullImageOptions) -> Result<TextStream, ClientError> {
        self.client
            .post_stream(&environment_path(environment_id, "images/pull"), options)
    }

    pub fn remove(&self, environment_id: &str, image_id: &str) -> Result<(), ClientError> {
        self.client
            .delete::<Value>(&environment_path(environment_id, &format!("images/{image_id}")))?;
        Ok(())
    }

    pub fn prune(&self, environment_id: &str) -> Result<ImagePruneReport, ClientError> {
        let resp: ApiResponse<ImagePruneReport> = self
            .client
            .post_empty(&environment_path(environment_id, "images/prune"))?;
        Ok(resp.data)
    }

    pub fn counts(&self, environment_id: &str) -> Result<ImageCounts, ClientError> {
        let resp: ApiResponse<ImageCounts> = self.client.get(&environment_path(environment_id, "images/counts"))?;
        Ok(resp.data)
    }
}
