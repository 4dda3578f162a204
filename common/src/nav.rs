//! 画面遷移とログインフラグ

/// ログインフラグの保存キー
pub const AUTH_FLAG_KEY: &str = "auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    DonorSignup,
    OrganizationSignup,
    /// ログイン必須
    DonorMatch,
    GetHelp,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Landing,
        Route::Login,
        Route::DonorSignup,
        Route::OrganizationSignup,
        Route::DonorMatch,
        Route::GetHelp,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::DonorSignup => "/donor-signup",
            Route::OrganizationSignup => "/organizations",
            Route::DonorMatch => "/donor",
            Route::GetHelp => "/get-help",
        }
    }

    /// 未知のパスはトップへ
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .unwrap_or(Route::Landing)
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::DonorMatch)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Give & Get",
            Route::Login => "Log In",
            Route::DonorSignup => "Donor Sign Up",
            Route::OrganizationSignup => "Organization Registration",
            Route::DonorMatch => "Donate",
            Route::GetHelp => "Get Help",
        }
    }
}

/// ログインの種別（画面上の選択肢）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    Individual,
    Center,
}

impl LoginKind {
    /// ログイン後の遷移先
    pub fn landing_route(&self) -> Route {
        match self {
            LoginKind::Individual => Route::DonorMatch,
            LoginKind::Center => Route::OrganizationSignup,
        }
    }
}

/// ログインフラグの保存先（ブラウザではlocalStorage）
pub trait AuthStore {
    fn is_authenticated(&self) -> bool;
    fn set_authenticated(&self, value: bool);
}

/// 遷移先を決める（ログイン必須画面でフラグがなければLoginへ）
pub fn guard(route: Route, store: &impl AuthStore) -> Route {
    if route.requires_auth() && !store.is_authenticated() {
        log::debug!("redirecting {} to login", route.path());
        Route::Login
    } else {
        route
    }
}
