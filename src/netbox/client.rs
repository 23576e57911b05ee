use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

use crate::fields::{FieldSpec, RecordType};
use crate::provision::{FieldRecord, SchemaApi};

use super::types::*;

const CUSTOM_FIELDS: &str = "/extras/custom-fields/";
const CONTENT_TYPES: &str = "/extras/content-types/";

/// NetBox API client
pub struct NetBoxClient {
    base_url: String,
    token: String,
    page_limit: u32,
    client: Client,
}

impl NetBoxClient {
    pub fn new(url: String, token: String, timeout: Duration, page_limit: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            token,
            page_limit: page_limit.max(1),
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
    }

    /// Turn a non-2xx response into an error carrying status and body
    async fn check(resp: Response, action: &str) -> Result<Response> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("NetBox API {} error {}: {}", action, status, body));
        }
        Ok(resp)
    }

    /// GET a list endpoint and follow `next` links until exhausted
    async fn list_paginated<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let limit = self.page_limit.to_string();
        let first = self
            .request(self.client.get(self.api_url(endpoint)))
            .query(query)
            .query(&[("limit", limit.as_str())]);

        let resp = Self::check(first.send().await?, "list").await?;
        let mut page: PaginatedResponse<T> = resp.json().await?;
        let mut items = std::mem::take(&mut page.results);

        while let Some(next) = page.next.take() {
            let resp = Self::check(self.request(self.client.get(&next)).send().await?, "list").await?;
            page = resp.json().await?;
            items.append(&mut page.results);
        }

        Ok(items)
    }

    /// First item of a filtered list, if any
    async fn get_first<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let resp = self
            .request(self.client.get(self.api_url(endpoint)))
            .query(query)
            .send()
            .await?;

        let paginated: PaginatedResponse<T> = Self::check(resp, "lookup").await?.json().await?;
        Ok(paginated.results.into_iter().next())
    }

    async fn create_resource<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        let resp = self
            .request(self.client.post(self.api_url(endpoint)))
            .json(body)
            .send()
            .await?;

        Ok(Self::check(resp, "create").await?.json().await?)
    }

    async fn patch_resource<T, B>(&self, endpoint: &str, id: i64, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        let resp = self
            .request(self.client.patch(self.api_url(&format!("{}{}/", endpoint, id))))
            .json(body)
            .send()
            .await?;

        Ok(Self::check(resp, "update").await?.json().await?)
    }

    async fn delete_resource(&self, endpoint: &str, id: i64) -> Result<()> {
        let resp = self
            .request(self.client.delete(self.api_url(&format!("{}{}/", endpoint, id))))
            .send()
            .await?;

        Self::check(resp, "delete").await?;
        Ok(())
    }

    /// Check connectivity and token, returning the NetBox version
    pub async fn status(&self) -> Result<NbStatus> {
        let resp = self.request(self.client.get(self.api_url("/status/"))).send().await?;
        Ok(Self::check(resp, "status").await?.json().await?)
    }
}

/// The field whose name equals `name`, wherever it sits in the results
fn exact_match(fields: Vec<NbCustomField>, name: &str) -> Option<NbCustomField> {
    fields.into_iter().find(|cf| cf.name == name)
}

#[async_trait]
impl SchemaApi for NetBoxClient {
    async fn lookup_field(&self, name: &str) -> Result<Option<FieldRecord>> {
        let fields: Vec<NbCustomField> = self.list_paginated(CUSTOM_FIELDS, &[("name", name)]).await?;
        Ok(exact_match(fields, name).map(FieldRecord::from))
    }

    async fn lookup_fields(&self, group: &str) -> Result<Vec<FieldRecord>> {
        let fields: Vec<NbCustomField> = self.list_paginated(CUSTOM_FIELDS, &[("group_name", group)]).await?;
        Ok(fields
            .into_iter()
            .filter(|cf| cf.group_name == group)
            .map(FieldRecord::from)
            .collect())
    }

    async fn define_field(&self, spec: &FieldSpec) -> Result<FieldRecord> {
        // NetBox requires content types on create; bind() settles the final set
        let content_types = spec.target_set().iter().map(|t| t.content_type()).collect();
        let record = FieldRecord::from_spec(0, spec);
        let body = CustomFieldWrite::from_record(&record, Some(content_types));

        let created: NbCustomField = self.create_resource(CUSTOM_FIELDS, &body).await?;
        tracing::debug!("Created custom field {} (id {})", created.name, created.id);
        Ok(created.into())
    }

    async fn bind(&self, record: &mut FieldRecord, object_types: &[String]) -> Result<()> {
        let mut wanted = object_types.to_vec();
        wanted.sort();
        let mut current = record.object_types.clone();
        current.sort();
        if wanted == current {
            return Ok(());
        }

        let updated: NbCustomField = self
            .patch_resource(CUSTOM_FIELDS, record.id, &ContentTypesPatch { content_types: wanted })
            .await?;
        record.object_types = updated.content_types;
        Ok(())
    }

    async fn save(&self, record: &FieldRecord) -> Result<()> {
        let body = CustomFieldWrite::from_record(record, None);
        let _: NbCustomField = self.patch_resource(CUSTOM_FIELDS, record.id, &body).await?;
        Ok(())
    }

    async fn delete(&self, record: &FieldRecord) -> Result<()> {
        self.delete_resource(CUSTOM_FIELDS, record.id).await
    }

    async fn resolve_record_type(&self, record_type: RecordType) -> Result<String> {
        let found: Option<NbContentType> = self
            .get_first(
                CONTENT_TYPES,
                &[("app_label", record_type.app_label()), ("model", record_type.model())],
            )
            .await?;

        match found {
            Some(ct) => Ok(format!("{}.{}", ct.app_label, ct.model)),
            None => Err(anyhow::anyhow!(
                "NetBox has no content type {} for {}",
                record_type.content_type(),
                record_type
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> NetBoxClient {
        NetBoxClient::new(url.to_string(), "0123abcd".to_string(), Duration::from_secs(5), 0).unwrap()
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let nb = client("https://netbox.example.com/");
        assert_eq!(
            nb.api_url(CUSTOM_FIELDS),
            "https://netbox.example.com/api/extras/custom-fields/"
        );
        assert_eq!(nb.auth_header(), "Token 0123abcd");
        assert_eq!(nb.page_limit, 1);
    }

    fn custom_field(id: i64, name: &str) -> NbCustomField {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "type": {"value": "text", "label": "Text"},
        }))
        .unwrap()
    }

    #[test]
    fn test_exact_match_searches_every_result() {
        let fields = vec![custom_field(1, "rx_wavelength_old"), custom_field(2, "rx_wavelength")];
        assert_eq!(exact_match(fields, "rx_wavelength").map(|cf| cf.id), Some(2));

        let fields = vec![custom_field(1, "rx_wavelength_old")];
        assert!(exact_match(fields, "rx_wavelength").is_none());
        assert!(exact_match(Vec::new(), "rx_wavelength").is_none());
    }

    #[test]
    fn test_bind_skips_unchanged_set() {
        // Unreachable base URL: any request would fail, so success means no request was sent
        let nb = client("http://127.0.0.1:1");
        let mut record = FieldRecord {
            id: 4,
            name: "insertion_loss".to_string(),
            label: "Ins Loss".to_string(),
            group: "Optical Loss".to_string(),
            value_kind: "text".to_string(),
            description: String::new(),
            choices: vec![],
            default: None,
            min: None,
            max: None,
            object_types: vec!["dcim.rearport".to_string(), "dcim.frontport".to_string()],
        };
        let wanted = vec!["dcim.frontport".to_string(), "dcim.rearport".to_string()];
        tokio_test::block_on(nb.bind(&mut record, &wanted)).unwrap();
    }
}
