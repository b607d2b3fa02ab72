use crate::error::{FairstayError, Result};
use crate::upload::UploadStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 開発サーバー
pub const DEV_API_URL: &str = "http://localhost:3000";

/// 本番（API Gateway）
pub const PROD_API_URL: &str =
    "https://y0uhk6afg9.execute-api.ap-northeast-2.amazonaws.com/default/fairstay-mvp-backend";

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_UPLOAD_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_ANALYSIS_TIMEOUT_MS: u64 = 120_000;

/// ヘルスチェックは設定に関係なく固定
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

const ENV_API_URL: &str = "FAIRSTAY_API_URL";
const ENV_ENVIRONMENT: &str = "FAIRSTAY_ENV";

/// 接続先環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApiEnvironment {
    #[default]
    Development,
    Production,
}

impl ApiEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            ApiEnvironment::Development => DEV_API_URL,
            ApiEnvironment::Production => PROD_API_URL,
        }
    }
}

impl std::str::FromStr for ApiEnvironment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(ApiEnvironment::Development),
            "production" | "prod" => Ok(ApiEnvironment::Production),
            _ => Err(format!("Unknown environment: {}. Use development or production", s)),
        }
    }
}

/// 操作ごとのタイムアウト枠
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutBudget {
    /// 通常のAPI呼び出し
    Default,
    /// 画像送信（PUT・マルチパート・確認）
    Upload,
    /// AI解析
    Analysis,
    /// ヘルスチェック（固定5秒）
    Health,
}

/// APIクライアント設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub upload_timeout_ms: u64,
    pub analysis_timeout_ms: u64,
    pub upload_strategy: UploadStrategy,
    /// 送信前の縮小上限（px）。None なら無加工で送る
    pub max_image_dimension: Option<u32>,
    /// 再エンコード時のJPEG品質 (1-100)
    pub jpeg_quality: u8,
    /// セッションIDの保存先（省略時は設定ディレクトリ）
    pub session_store_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::for_environment(ApiEnvironment::default())
    }
}

impl ApiConfig {
    pub fn for_environment(env: ApiEnvironment) -> Self {
        Self {
            base_url: env.base_url().into(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            upload_timeout_ms: DEFAULT_UPLOAD_TIMEOUT_MS,
            analysis_timeout_ms: DEFAULT_ANALYSIS_TIMEOUT_MS,
            upload_strategy: UploadStrategy::default(),
            max_image_dimension: Some(1920),  // 端末ピッカーと同じ上限
            jpeg_quality: 80,
            session_store_path: None,
        }
    }

    /// 設定ファイル → 環境変数の順で読み込み
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file(&Self::config_path()?)?;
        config.apply_env_overrides(
            std::env::var(ENV_ENVIRONMENT).ok().as_deref(),
            std::env::var(ENV_API_URL).ok().as_deref(),
        )?;
        config.validate()?;
        Ok(config)
    }

    /// 設定ファイルのみ（なければ既定値）
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 環境変数の上書き
    ///
    /// `FAIRSTAY_ENV` で環境の baseUrl に切り替え、`FAIRSTAY_API_URL` があればさらに優先する。
    pub fn apply_env_overrides(&mut self, environment: Option<&str>, api_url: Option<&str>) -> Result<()> {
        if let Some(env) = environment.map(str::trim).filter(|v| !v.is_empty()) {
            let env: ApiEnvironment = env.parse().map_err(FairstayError::Config)?;
            self.base_url = env.base_url().to_string();
        }

        if let Some(url) = api_url.map(str::trim).filter(|v| !v.is_empty()) {
            self.base_url = url.to_string();
        }

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 設定ファイルの内容だけを書き換えて保存
    ///
    /// 実行時の上書き（CLIフラグ・環境変数）はファイルに残さない。
    pub fn update_stored(path: &Path, edit: impl FnOnce(&mut ApiConfig)) -> Result<ApiConfig> {
        let mut stored = Self::load_file(path)?;
        edit(&mut stored);
        stored.save_to(path)?;
        Ok(stored)
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FairstayError::Config("홈 디렉터리를 찾을 수 없습니다".into()))?;
        Ok(home.join(".config").join("fairstay"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// セッションIDファイルの場所
    pub fn session_store_path(&self) -> Result<PathBuf> {
        match &self.session_store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("session.json")),
        }
    }

    /// 設定値の整合性チェック
    ///
    /// タイムアウトは 通常 < アップロード < 解析 でなければならない。
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(FairstayError::Config("baseUrl 이 비어 있습니다".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(FairstayError::Config("requestTimeoutMs 는 0 보다 커야 합니다".into()));
        }
        if self.request_timeout_ms >= self.upload_timeout_ms {
            return Err(FairstayError::Config(format!(
                "uploadTimeoutMs ({}) 는 requestTimeoutMs ({}) 보다 길어야 합니다",
                self.upload_timeout_ms, self.request_timeout_ms
            )));
        }
        if self.upload_timeout_ms >= self.analysis_timeout_ms {
            return Err(FairstayError::Config(format!(
                "analysisTimeoutMs ({}) 는 uploadTimeoutMs ({}) 보다 길어야 합니다",
                self.analysis_timeout_ms, self.upload_timeout_ms
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(FairstayError::Config(format!(
                "jpegQuality ({}) 는 1-100 사이여야 합니다",
                self.jpeg_quality
            )));
        }
        if self.max_image_dimension == Some(0) {
            return Err(FairstayError::Config("maxImageDimension 은 0 일 수 없습니다".into()));
        }
        Ok(())
    }

    pub fn timeout(&self, budget: TimeoutBudget) -> Duration {
        match budget {
            TimeoutBudget::Default => Duration::from_millis(self.request_timeout_ms),
            TimeoutBudget::Upload => Duration::from_millis(self.upload_timeout_ms),
            TimeoutBudget::Analysis => Duration::from_millis(self.analysis_timeout_ms),
            TimeoutBudget::Health => HEALTH_TIMEOUT,
        }
    }
}
