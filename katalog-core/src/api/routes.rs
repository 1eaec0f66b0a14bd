macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

/// Route definitions for the catalog HTTP surface.
pub mod api {
    pub const ROOT: &str = "/api";

    pub mod items {
        pub const LIST: &str = api_path!("/list");
        pub const ADD: &str = api_path!("/tambah");
        pub const DELETE: &str = api_path!("/hapus");
        pub const IMAGE: &str = api_path!("/image/{id}");
    }

    pub mod auth {
        pub const LOGIN: &str = api_path!("/login");
        pub const LOGOUT: &str = api_path!("/logout");
        pub const CHECK_ADMIN: &str = api_path!("/check-admin");
    }

    pub mod logs {
        pub const LIST: &str = api_path!("/logs");
        pub const CLEAR: &str = api_path!("/logs-clear");
    }
}

/// Concrete image path for `id`.
pub fn image_path(id: &str) -> String {
    api::items::IMAGE.replace("{id}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_path_fills_placeholder() {
        assert_eq!(image_path("abc"), "/api/image/abc");
    }
}
