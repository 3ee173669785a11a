use clap::Parser;
use product_wizard::{autosave, cli, config, error, interactive, media, sku, storage, terminal, transport};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, WizardError};
use interactive::{InteractiveForm, Outcome};
use product_wizard_common::validation::validate_step;
use product_wizard_common::{DraftSlot, DraftStore, FormSession, MarkupEditor, Step};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage::FileSlot;
use terminal::{FixedAnswer, TerminalConfirm, TerminalNotifier};
use transport::DirectoryTransport;

type CliSession = FormSession<FileSlot, TerminalNotifier>;

/// 保存済みの下書きからセッションを開く
fn open_draft(config: &Config, slot: FileSlot) -> Result<CliSession> {
    if !matches!(slot.get(), Ok(Some(_))) {
        return Err(WizardError::NoDraft(slot.path().display().to_string()));
    }
    let mut editor = MarkupEditor::default();
    Ok(FormSession::start(
        config.form.clone(),
        slot,
        TerminalNotifier::new(),
        &mut editor,
        sku::generate(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(path) = cli.draft {
        config.draft_path = Some(path);
    }
    let slot = FileSlot::new(config.draft_path()?);
    if cli.verbose {
        println!("下書き: {}", slot.path().display());
    }

    match cli.command {
        Commands::New { images, output, no_autosave } => {
            println!("🛒 product-wizard - 商品登録\n");

            let progress = interactive::progress_bar();
            let notifier = TerminalNotifier::new().with_progress(progress.clone());
            let mut editor = MarkupEditor::default();
            let mut session =
                FormSession::start(config.form.clone(), slot, notifier, &mut editor, sku::generate());

            if !images.is_empty() {
                let files = media::load_paths(&images)?;
                let added = session.add_images(files);
                println!("✔ {}枚の画像を追加", added);
            }

            let shared = Arc::new(Mutex::new(session));
            let period = Duration::from_millis(config.form.autosave_interval_ms);
            let saver = (!no_autosave && !period.is_zero())
                .then(|| autosave::spawn(Arc::clone(&shared), period));

            let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
            let mut form = InteractiveForm::new(
                Arc::clone(&shared),
                editor,
                progress.clone(),
                DirectoryTransport::new(output_dir),
            );
            let outcome = tokio::task::block_in_place(|| form.run());

            if let Some(saver) = saver {
                if cli.verbose {
                    println!("自動保存: {}", saver.status().label());
                }
                saver.stop();
            }
            progress.finish_and_clear();

            match outcome? {
                Outcome::Submitted(dir) => {
                    if let Some(dir) = dir {
                        println!("✔ 送信データ: {}", dir.display());
                    }
                    println!("\n✅ 登録完了");
                }
                Outcome::Saved => {
                    println!("💾 下書きを保存しました。`product-wizard new` で再開できます");
                }
                Outcome::Cancelled => println!("登録をキャンセルしました"),
            }
        }

        Commands::Draft { show, clear } => {
            let path = slot.path().to_path_buf();
            if show || !clear {
                match DraftStore::new(slot.clone()).load() {
                    Some(draft) => {
                        println!("下書き: {}", path.display());
                        println!("{}", serde_json::to_string_pretty(&draft)?);
                    }
                    None => println!("下書きは保存されていません: {}", path.display()),
                }
            }

            if clear {
                let mut slot = slot;
                slot.remove()?;
                println!("✔ 下書きを削除しました: {}", path.display());
            }
        }

        Commands::Validate => {
            let session = open_draft(&config, slot)?;
            let mut first_error = None;
            for step in Step::INPUT_STEPS {
                let result = validate_step(step, session.state());
                if result.is_valid() {
                    println!("✔ ステップ{} {}", step.number(), step.title());
                } else {
                    println!("✖ ステップ{} {}", step.number(), step.title());
                    println!("{}", interactive::render_errors(&result));
                    first_error.get_or_insert(result);
                }
            }
            if let Some(result) = first_error {
                return Err(WizardError::Invalid(result));
            }
            println!("\n✅ 全ステップの入力に問題はありません");
        }

        Commands::Preview { json } => {
            let session = open_draft(&config, slot)?;
            let model = session.preview();
            if json {
                println!("{}", serde_json::to_string_pretty(&model)?);
            } else {
                println!("{}", interactive::render_preview(&model));
            }
        }

        Commands::Submit { images, output } => {
            println!("📦 product-wizard - 送信\n");

            let mut session = open_draft(&config, slot)?;
            if !images.is_empty() {
                let files = media::load_paths(&images)?;
                session.add_images(files);
            }
            let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
            let mut transport = DirectoryTransport::new(output_dir);
            session.submit(&mut transport)?;
            if let Some(dir) = transport.last_output() {
                println!("✔ 送信データ: {}", dir.display());
            }
            println!("\n✅ 登録完了");
        }

        Commands::Cancel { yes } => {
            let mut session = open_draft(&config, slot)?;
            let intent = if yes {
                session.cancel(&mut FixedAnswer(true))
            } else {
                session.cancel(&mut TerminalConfirm)
            };
            match intent {
                Some(intent) => println!("入力を破棄しました（→ {}）", intent.target()),
                None => println!("下書きはそのまま残しています"),
            }
        }

        Commands::Config { set_output_dir, set_autosave_secs, show } => {
            let mut config = Config::load()?;
            let mut changed = false;

            if let Some(dir) = set_output_dir {
                config.output_dir = dir;
                changed = true;
            }
            if let Some(secs) = set_autosave_secs {
                config.form.autosave_interval_ms = secs.saturating_mul(1000);
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  タグ上限: {}", config.form.max_tags);
                println!("  画像上限: {}", config.form.max_images);
                println!("  自動保存: {}秒", config.form.autosave_interval_ms / 1000);
                println!("  下書き: {}", config.draft_path()?.display());
                println!("  出力先: {}", config.output_dir.display());
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}
