use crate::config::ApiEnvironment;
use crate::upload::UploadStrategy;
use clap::{Parser, Subcommand};
use fairstay_common::UserType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fairstay")]
#[command(about = "가구·실내 손상 점검 API 클라이언트", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 接続先環境 (development/production)
    #[arg(long, global = true)]
    pub env: Option<ApiEnvironment>,

    /// APIのベースURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// セッションIDの保存先
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// セッションを確保して表示
    Session {
        /// 利用者区分 (tenant/landlord)
        #[arg(short, long)]
        user_type: Option<UserTypeArg>,

        /// 保存済みセッションを破棄して再発行
        #[arg(long)]
        reset: bool,
    },

    /// 画像をアップロード
    Upload {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// アップロード方式
        #[arg(short, long)]
        strategy: Option<UploadStrategy>,
    },

    /// アップロード済み画像のAI解析
    Analyze {
        #[arg(required = true)]
        image_id: String,
    },

    /// セッション確保からAI解析まで一括実行
    Inspect {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 利用者区分 (tenant/landlord)
        #[arg(short, long, default_value = "tenant")]
        user_type: UserTypeArg,

        /// アップロード方式
        #[arg(short, long)]
        strategy: Option<UploadStrategy>,
    },

    /// 画像のレポートを表示
    Report {
        #[arg(required = true)]
        image_id: String,
    },

    /// セッション内の画像一覧
    Images {
        /// セッションID（省略時は保存済みのもの）
        #[arg(short, long)]
        session: Option<String>,
    },

    /// 共有リンクを発行
    Share {
        #[arg(required = true)]
        image_id: String,

        /// カカオトーク共有データを生成
        #[arg(long)]
        kakao: bool,
    },

    /// アンケートを送信（評価を省略すると対話入力）
    Survey {
        /// 対象の画像ID
        #[arg(short, long)]
        image_id: Option<String>,

        /// 不動産取引の経験あり
        #[arg(long)]
        experienced: bool,

        /// 説明のわかりやすさ (1-5)
        #[arg(long)]
        explanation: Option<u8>,

        /// 手続きの便利さ (1-5)
        #[arg(long)]
        convenience: Option<u8>,

        /// 総合満足度 (1-5)
        #[arg(long)]
        satisfaction: Option<u8>,

        /// 自由記述
        #[arg(long)]
        comment: Option<String>,
    },

    /// サーバー疎通確認
    Health,

    /// 設定を表示/編集
    Config {
        /// ベースURLを保存
        #[arg(long)]
        set_base_url: Option<String>,

        /// アップロード方式を保存
        #[arg(long)]
        set_strategy: Option<UploadStrategy>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 利用者区分（CLI用）
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum UserTypeArg {
    Tenant,
    Landlord,
}

impl From<UserTypeArg> for UserType {
    fn from(arg: UserTypeArg) -> Self {
        match arg {
            UserTypeArg::Tenant => UserType::Tenant,
            UserTypeArg::Landlord => UserType::Landlord,
        }
    }
}
