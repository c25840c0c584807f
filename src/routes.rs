use std::fmt;

/// 경로로 열 수 있는 화면.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Me,
    Artist(u64),
    Playlist(u64),
}

impl Route {
    /// `/artist/6452` 같은 경로를 화면으로 바꾼다.
    ///
    /// 받는 형식:
    /// - "/artist/6452"
    /// - "#/artist/6452" (해시 라우팅)
    /// - "/artist/6452/", "/artist/6452?tab=album"
    pub fn resolve(path: &str) -> Option<Route> {
        let path = path.trim();
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["me"] => Some(Route::Me),
            ["artist", id] => id.parse().ok().map(Route::Artist),
            ["playlist", id] => id.parse().ok().map(Route::Playlist),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Login => "login",
            Route::Me => "me",
            Route::Artist(_) => "artist",
            Route::Playlist(_) => "playlist",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Me => "/me".to_string(),
            Route::Artist(id) => format!("/artist/{}", id),
            Route::Playlist(id) => format!("/playlist/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_routes() {
        assert_eq!(Route::resolve("/"), Some(Route::Home));
        assert_eq!(Route::resolve(""), Some(Route::Home));
        assert_eq!(Route::resolve("/login"), Some(Route::Login));
        assert_eq!(Route::resolve("/me/"), Some(Route::Me));
    }

    #[test]
    fn test_param_routes() {
        assert_eq!(Route::resolve("/artist/6452"), Some(Route::Artist(6452)));
        assert_eq!(Route::resolve("#/playlist/19723756"), Some(Route::Playlist(19723756)));
        assert_eq!(Route::resolve("/artist/12?tab=album"), Some(Route::Artist(12)));
    }

    #[test]
    fn test_unknown_routes() {
        assert_eq!(Route::resolve("/artist"), None);
        assert_eq!(Route::resolve("/artist/abc"), None);
        assert_eq!(Route::resolve("/artist/1/songs"), None);
        assert_eq!(Route::resolve("/settings"), None);
    }

    #[test]
    fn test_name_and_path_invert_resolve() {
        for route in [
            Route::Home,
            Route::Login,
            Route::Me,
            Route::Artist(3),
            Route::Playlist(4),
        ] {
            assert_eq!(Route::resolve(&route.path()), Some(route));
        }
        assert_eq!(Route::Playlist(4).name(), "playlist");
    }
}
