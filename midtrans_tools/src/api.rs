use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::MidtransConfig,
    data_objects::{SnapToken, SnapTransaction},
    helpers::basic_auth_header,
    MidtransApiError,
};

#[derive(Clone)]
pub struct MidtransApi {
    config: MidtransConfig,
    client: Arc<Client>,
}

impl MidtransApi {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        if !config.is_configured() {
            return Err(MidtransApiError::Initialization("No Midtrans server key has been configured".into()));
        }
        let mut headers = HeaderMap::with_capacity(3);
        let auth = HeaderValue::from_str(&basic_auth_header(config.server_key.reveal()))
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MidtransConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, MidtransApiError> {
        let url = self.url(path);
        trace!("💳️ Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| MidtransApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("💳️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| MidtransApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| MidtransApiError::RestResponseError(e.to_string()))?;
            Err(MidtransApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.snap_base_url())
    }

    /// Creates a Snap transaction for the order and returns the hosted payment page details.
    pub async fn create_transaction(&self, transaction: &SnapTransaction) -> Result<SnapToken, MidtransApiError> {
        let order_id = &transaction.transaction_details.order_id;
        debug!("💳️ Creating Snap transaction for order {order_id}");
        let token =
            self.rest_query::<SnapToken, &SnapTransaction>(Method::POST, "/snap/v1/transactions", Some(transaction)).await?;
        info!("💳️ Snap transaction created for order {order_id}");
        Ok(token)
    }
}
