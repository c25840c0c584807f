use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::ApiError;
use crate::config::ApiConfig;

/// 음악 카탈로그 API용 HTTP 클라이언트.
/// 모든 요청은 `GET base_url + path` 에 평평한 쿼리 파라미터를 붙인다.
pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    cookie: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("HTTP 클라이언트 생성에 실패했습니다")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie: config.cookie.clone().filter(|c| !c.is_empty()),
        })
    }

    /// 상태 코드와 응답 본문을 그대로 돌려준다.
    pub(crate) fn get_raw(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(reqwest::StatusCode, String)> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?params, "GET");

        let mut request = self.client.get(&url).query(params);
        if let Some(ref cookie) = self.cookie {
            request = request.query(&[("cookie", cookie.as_str())]);
        }

        let resp = request
            .send()
            .with_context(|| format!("{} 요청에 실패했습니다", path))?;
        let status = resp.status();
        let body = resp
            .text()
            .with_context(|| format!("{} 응답 읽기에 실패했습니다", path))?;
        Ok((status, body))
    }

    /// GET 요청을 보내고 JSON 응답을 `T`로 해석한다.
    pub fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let (status, body) = self.get_raw(path, params)?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            })
            .with_context(|| format!("{} 요청이 실패했습니다", path));
        }
        parse_response(&body).with_context(|| format!("{} 응답 파싱에 실패했습니다", path))
    }
}

/// 응답 본문을 해석한다. `code` 필드가 있고 200이 아니면 오류.
pub(crate) fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: Value = serde_json::from_str(body)?;
    check_code(&value)?;
    Ok(serde_json::from_value(value)?)
}

fn check_code(value: &Value) -> Result<(), ApiError> {
    match value.get("code").and_then(Value::as_i64) {
        Some(200) | None => Ok(()),
        Some(code) => {
            let message = value
                .get("message")
                .or_else(|| value.get("msg"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Err(ApiError::Code { code, message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Echo {
        value: u32,
    }

    #[test]
    fn test_parse_ok() {
        let echo: Echo = parse_response(r#"{"code":200,"value":7}"#).unwrap();
        assert_eq!(echo.value, 7);
    }

    #[test]
    fn test_parse_without_code() {
        let echo: Echo = parse_response(r#"{"value":3}"#).unwrap();
        assert_eq!(echo.value, 3);
    }

    #[test]
    fn test_parse_bad_code() {
        let err = parse_response::<Echo>(r#"{"code":301,"msg":"需要登录"}"#).unwrap_err();
        match err.downcast_ref::<ApiError>() {
            Some(ApiError::Code { code, message }) => {
                assert_eq!(*code, 301);
                assert_eq!(message, "需要登录");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:3000/".to_string(),
            cookie: Some(String::new()),
            timeout_secs: 1,
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
        assert!(client.cookie.is_none());
    }
}
