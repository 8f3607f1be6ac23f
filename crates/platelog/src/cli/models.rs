//! The `platelog models` command for managing the classifier model.

use clap::{Args, Subcommand};
use platelog_core::classifier::MODEL_FILENAME;
use platelog_core::pipeline::Hasher;
use platelog_core::Config;
use std::path::Path;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download the configured classifier and its label file
    Download,

    /// List installed models
    List,

    /// Show model directory path
    Path,
}

/// A classifier that `models download` knows how to fetch.
struct KnownModel {
    name: &'static str,
    label: &'static str,
    model_url: &'static str,
    labels_url: &'static str,
}

const KNOWN_MODELS: &[KnownModel] = &[KnownModel {
    name: "mobilenetv2-12",
    label: "MobileNetV2 (ImageNet, 224)",
    model_url: "https://github.com/onnx/models/raw/main/validated/vision/classification/mobilenet/model/mobilenetv2-12.onnx",
    labels_url: "https://raw.githubusercontent.com/pytorch/hub/master/imagenet_classes.txt",
}];

fn known_model(name: &str) -> Option<&'static KnownModel> {
    KNOWN_MODELS.iter().find(|m| m.name == name)
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs, config: &Config) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::Download => download(config).await?,

        ModelsCommand::List => {
            let model_dir = config.model_dir();

            if !model_dir.exists() {
                println!("No models installed.");
                println!("Run `platelog models download` to download the classifier.");
                return Ok(());
            }

            println!("Installed models:");
            println!("  Directory: {}\n", model_dir.display());

            let mut names: Vec<String> = std::fs::read_dir(&model_dir)?
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_dir())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect();
            if !names.contains(&config.classifier.model) {
                names.push(config.classifier.model.clone());
            }
            names.sort();

            for name in names {
                let dir = model_dir.join(&name);
                let status = install_status(
                    &dir.join(MODEL_FILENAME),
                    &dir.join(&config.classifier.labels_file),
                );
                let default_marker = if name == config.classifier.model {
                    "  (default)"
                } else {
                    ""
                };
                println!("    - {:30} {:14}{}", name, status, default_marker);
            }
        }

        ModelsCommand::Path => {
            println!("{}", config.model_dir().display());
        }
    }

    Ok(())
}

fn install_status(model: &Path, labels: &Path) -> &'static str {
    match (model.exists(), labels.exists()) {
        (true, true) => "ready",
        (true, false) => "missing labels",
        (false, true) => "missing model",
        (false, false) => "not installed",
    }
}

/// Download the configured classifier and label file. Skips files already present.
async fn download(config: &Config) -> anyhow::Result<()> {
    let name = &config.classifier.model;
    let Some(model) = known_model(name) else {
        anyhow::bail!(
            "No download source for classifier '{name}'.\n\
             Place {MODEL_FILENAME} and {} in {} manually.",
            config.classifier.labels_file,
            config.model_dir().join(name).display()
        );
    };

    let model_path = config.classifier_model_path();
    let labels_path = config.classifier_labels_path();
    if let Some(dir) = model_path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let client = reqwest::Client::new();

    if model_path.exists() {
        tracing::info!("{} already exists at {:?}", model.label, model_path);
    } else {
        tracing::info!("Downloading {}...", model.label);
        tracing::info!("  Source: {}", model.model_url);
        tracing::info!("  Destination: {:?}", model_path);
        download_file(
            &client,
            model.model_url,
            &model_path,
            config.classifier.model_blake3.as_deref(),
        )
        .await?;
        let file_size = std::fs::metadata(&model_path)?.len();
        tracing::info!(
            "  {} complete ({:.1} MB)",
            model.label,
            file_size as f64 / (1024.0 * 1024.0)
        );
    }

    if labels_path.exists() {
        tracing::info!("Labels already exist at {:?}", labels_path);
    } else {
        tracing::info!("Downloading labels...");
        tracing::info!("  Source: {}", model.labels_url);
        download_file(&client, model.labels_url, &labels_path, None).await?;
    }

    tracing::info!("All downloads complete.");
    Ok(())
}

/// Download a file from a URL to a local path, streaming to disk.
///
/// Writes to a `.part` file first and renames on success, so an interrupted
/// download never looks installed. If `expected_blake3` is provided, the file
/// is verified before the rename.
async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    expected_blake3: Option<&str>,
) -> anyhow::Result<()> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;

    let progress = create_progress_bar(response.content_length());
    let partial = dest.with_extension("part");

    let mut file = tokio::fs::File::create(&partial).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        progress.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);
    progress.finish_and_clear();

    if let Some(expected) = expected_blake3 {
        verify_blake3(&partial, expected)?;
    }

    tokio::fs::rename(&partial, dest).await?;
    Ok(())
}

/// Byte progress bar, or a spinner when the size is unknown.
fn create_progress_bar(total: Option<u64>) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    match total {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}

/// Verify a downloaded file's BLAKE3 checksum.
///
/// On mismatch, removes the corrupt file so the next run re-downloads.
fn verify_blake3(path: &Path, expected: &str) -> anyhow::Result<()> {
    let actual = Hasher::content_hash(path)
        .map_err(|e| anyhow::anyhow!("Checksum computation failed for {}: {e}", path.display()))?;

    if !actual.eq_ignore_ascii_case(expected.trim()) {
        let _ = std::fs::remove_file(path);
        anyhow::bail!(
            "Checksum mismatch for {}:\n  expected: {}\n  actual:   {}\n\
             Corrupt file removed. Try downloading again.",
            path.display(),
            expected,
            actual
        );
    }

    tracing::debug!("  Checksum verified: {}", &actual[..16]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_blake3_correct_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx.part");
        std::fs::write(&path, b"hello platelog").unwrap();
        let expected = Hasher::content_hash(&path).unwrap();

        assert!(verify_blake3(&path, &expected.to_uppercase()).is_ok());
        assert!(path.exists(), "file should still exist after successful verify");
    }

    #[test]
    fn verify_blake3_wrong_hash_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx.part");
        std::fs::write(&path, b"hello platelog").unwrap();
        let wrong_hash = "0000000000000000000000000000000000000000000000000000000000000000";

        let err_msg = verify_blake3(&path, wrong_hash).unwrap_err().to_string();

        assert!(err_msg.contains("Checksum mismatch"), "{err_msg}");
        assert!(err_msg.contains("Corrupt file removed"), "{err_msg}");
        assert!(!path.exists(), "corrupt file should be deleted");
    }

    #[test]
    fn verify_blake3_missing_file() {
        let result = verify_blake3(
            Path::new("/nonexistent/model.onnx"),
            "0000000000000000000000000000000000000000000000000000000000000000",
        );
        assert!(result.is_err());
    }

    #[test]
    fn default_classifier_is_downloadable() {
        let config = Config::default();
        let model = known_model(&config.classifier.model).unwrap();
        assert!(model.model_url.ends_with(".onnx"));
        assert!(model.labels_url.ends_with(&config.classifier.labels_file));
    }

    #[test]
    fn install_status_reports_missing_parts() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join(MODEL_FILENAME);
        let labels = dir.path().join("imagenet_classes.txt");
        assert_eq!(install_status(&model, &labels), "not installed");

        std::fs::write(&model, b"onnx").unwrap();
        assert_eq!(install_status(&model, &labels), "missing labels");

        std::fs::write(&labels, b"tench\n").unwrap();
        assert_eq!(install_status(&model, &labels), "ready");
    }
}
