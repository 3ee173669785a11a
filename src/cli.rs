use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "product-wizard")]
#[command(about = "商品登録ウィザード（入力検証・下書き保存・プレビュー・送信）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 下書きファイル（設定より優先）
    #[arg(long, global = true)]
    pub draft: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話式で商品を登録（下書きがあれば続きから）
    New {
        /// 最初に追加する画像ファイル/フォルダ
        #[arg(short, long)]
        images: Vec<PathBuf>,

        /// 送信データの出力先（デフォルト: 設定の outputDir）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 自動保存を無効化
        #[arg(long)]
        no_autosave: bool,
    },

    /// 下書きを表示/削除
    Draft {
        /// 下書きの内容を表示
        #[arg(long)]
        show: bool,

        /// 下書きを削除
        #[arg(long)]
        clear: bool,
    },

    /// 下書きを全ステップ検証
    Validate,

    /// 下書きのプレビューを表示
    Preview {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 下書きを検証して送信
    Submit {
        /// 追加で添付する画像ファイル/フォルダ
        #[arg(short, long)]
        images: Vec<PathBuf>,

        /// 送信データの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 入力を破棄（確認あり）
    Cancel {
        /// 確認せずに破棄
        #[arg(short, long)]
        yes: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 送信データの出力先を設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// 自動保存の間隔（秒）を設定
        #[arg(long)]
        set_autosave_secs: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
