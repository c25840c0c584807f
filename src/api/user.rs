use anyhow::Result;
use serde::Deserialize;

use crate::api::ApiClient;
use crate::models::UserProfile;

#[derive(Deserialize)]
struct AccountResponse {
    profile: Option<WireProfile>,
}

#[derive(Deserialize)]
struct WireProfile {
    #[serde(rename = "userId")]
    user_id: u64,
    nickname: String,
    #[serde(rename = "avatarUrl")]
    avatar_url: Option<String>,
}

impl ApiClient {
    /// 쿠키에 해당하는 계정 프로필. 로그인하지 않았으면 `None`.
    pub fn account(&self) -> Result<Option<UserProfile>> {
        let resp: AccountResponse = self.get("/user/account", &[])?;
        Ok(resp.profile.map(|p| UserProfile {
            user_id: p.user_id,
            nickname: p.nickname,
            avatar_url: p.avatar_url,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::parse_response;

    #[test]
    fn test_account_payload() {
        let resp: AccountResponse = parse_response(
            r#"{"code":200,"account":{"id":1},"profile":{"userId":1,"nickname":"tester","avatarUrl":null}}"#,
        )
        .unwrap();
        let profile = resp.profile.unwrap();
        assert_eq!(profile.nickname, "tester");

        let anonymous: AccountResponse =
            parse_response(r#"{"code":200,"account":null,"profile":null}"#).unwrap();
        assert!(anonymous.profile.is_none());
    }
}
