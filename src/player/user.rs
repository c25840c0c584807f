use crate::models::UserProfile;

/// 로그인한 사용자 정보.
#[derive(Debug, Default)]
pub struct UserInfoStore {
    user_info: Option<UserProfile>,
}

impl UserInfoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_info(&mut self, info: UserProfile) {
        self.user_info = Some(info);
    }

    pub fn user_info(&self) -> Option<&UserProfile> {
        self.user_info.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut store = UserInfoStore::new();
        assert!(store.user_info().is_none());
        store.set_user_info(UserProfile {
            user_id: 7,
            nickname: "tester".to_string(),
            avatar_url: None,
        });
        assert_eq!(store.user_info().map(|u| u.user_id), Some(7));
    }
}
