//! Command implementations

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use crate::adapters::LocalMediaAdapter;
use crate::app::{select_clip, AppContainer, DefaultAppContainer, PreviewReport, PreviewRequest};
use crate::cli::args::{AnalyzeArgs, NormalizeArgs, OutputFormat, PreviewArgs};
use crate::domain::model::{AnalyzeRequest, AnalyzeResponse, Clip, MediaSource};
use crate::domain::rules::HashtagPolicy;
use crate::error::{ReelError, ReelResult};
use crate::normalize::normalize_with_report;
use crate::ports::MediaStorePort;
use crate::utils::time::{format_timestamp, format_window};

/// Execute the analyze command
pub async fn analyze(args: AnalyzeArgs, container: &DefaultAppContainer) -> Result<()> {
    let request = AnalyzeRequest::from_parts(args.file, args.url, args.max_clips)?;
    info!("Analyzing {}", request.source.display_name());

    let interactor = container.analyze_interactor();
    let response = interactor.analyze_once(request).await?;
    if response.skipped > 0 {
        warn!("{} clip records could not be used", response.skipped);
    }

    println!("{}", render(&response, args.format, render_analysis)?);
    Ok(())
}

/// Execute the normalize command
pub async fn normalize(args: NormalizeArgs) -> Result<()> {
    let payload = read_payload(&args.payload).await?;
    let normalized = normalize_with_report(&payload)?;

    let clips: Vec<Clip> = if args.enrich_hashtags {
        let policy = HashtagPolicy::default();
        normalized.clips.into_iter().map(|clip| policy.apply(clip)).collect()
    } else {
        normalized.clips
    };

    info!(
        clips = clips.len(),
        skipped = normalized.skipped.len(),
        "Normalized payload"
    );
    println!("{}", render(&clips, args.format, |clips| render_clip_list(clips))?);
    Ok(())
}

/// Execute the preview command
pub async fn preview(args: PreviewArgs, container: &DefaultAppContainer) -> Result<()> {
    let payload = read_payload(&args.payload).await?;
    let clips = normalize_with_report(&payload)?.clips;
    let clip = select_clip(&clips, args.clip.as_deref())?.clone();

    let source = match MediaSource::url(&args.source) {
        Ok(source) => source,
        Err(_) => MediaSource::file(&args.source)?,
    };

    let store = LocalMediaAdapter::new();
    let (master_src, media) = match &source {
        MediaSource::Url(url) => (url.clone(), None),
        MediaSource::File(path) => {
            let media = store.register(path).await?;
            (media.url.clone(), Some(media))
        }
    };

    let source_duration = args.duration.unwrap_or_else(|| {
        clips
            .iter()
            .map(Clip::end_sec)
            .fold(0.0_f64, f64::max)
    });

    let request = PreviewRequest {
        master_src,
        clip,
        source_duration,
        tick: Duration::from_millis(args.tick_ms),
        speed: args.speed,
        use_fragments: container.playback_options().use_fragments,
    };

    let result = container.preview_interactor().execute(request).await;
    if let Some(media) = media {
        store.revoke(&media).await;
    }
    let report = result?;

    println!("{}", render(&report, args.format, render_preview)?);
    Ok(())
}

/// Read a JSON payload from a file, or from stdin when the path is `-`
pub async fn read_payload(path: &str) -> ReelResult<Value> {
    let content = if path == "-" {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        buffer
    } else {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReelError::PayloadRead {
                path: path.to_string(),
                message: e.to_string(),
            })?
    };

    Ok(serde_json::from_str(&content)?)
}

/// Render a value in the requested format; `text` uses the given renderer
pub fn render<T, F>(value: &T, format: OutputFormat, text: F) -> ReelResult<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let rendered = match format {
        OutputFormat::Text => text(value),
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    Ok(rendered.trim_end().to_string())
}

fn render_analysis(response: &AnalyzeResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", response.source.name, response.source.master_src);
    out.push_str(&render_clip_list(&response.clips));
    if response.skipped > 0 {
        let _ = writeln!(out, "\n{} records skipped", response.skipped);
    }
    out
}

fn render_clip_list(clips: &[Clip]) -> String {
    let mut out = String::new();
    for (index, clip) in clips.iter().enumerate() {
        let _ = write!(
            out,
            "{:>3}. [{}] {}  {}",
            index + 1,
            clip.id(),
            clip.title(),
            format_window(clip.start_sec(), clip.end_sec())
        );
        if !clip.hashtags().is_empty() {
            let _ = write!(out, "  {}", clip.hashtags().join(" "));
        }
        if let Some(url) = clip.playback_url() {
            let _ = write!(out, "  -> {}", url);
        }
        out.push('\n');
    }
    out
}

fn render_preview(report: &PreviewReport) -> String {
    let mut out = String::new();
    match &report.error {
        Some(error) => {
            let _ = writeln!(out, "Clip {} did not play: {}", report.clip_id, error);
        }
        None => {
            let _ = writeln!(
                out,
                "Clip {} stopped at {}{}",
                report.clip_id,
                format_timestamp(report.stopped_at),
                if report.standalone { " (own media)" } else { "" }
            );
        }
    }
    for state in &report.transitions {
        let _ = writeln!(out, "  {:?}", state);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ClipWindow;
    use std::io::Write;

    fn clips() -> Vec<Clip> {
        vec![
            Clip::new("c1", "Opening hook", ClipWindow::new(3.0, 14.0).unwrap())
                .unwrap()
                .with_hashtags(vec!["#hook".to_string(), "#intro".to_string()]),
            Clip::new("c2", "Key insight", ClipWindow::new(35.0, 52.0).unwrap()).unwrap(),
        ]
    }

    #[test]
    fn test_render_text_list() {
        let text = render(&clips(), OutputFormat::Text, |c| render_clip_list(c)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  1. [c1] Opening hook  0:03-0:14  #hook #intro");
        assert_eq!(lines[1], "  2. [c2] Key insight  0:35-0:52");
    }

    #[test]
    fn test_render_json_and_yaml() {
        let json = render(&clips(), OutputFormat::Json, |_| String::new()).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[1]["startSec"], 35.0);

        let yaml = render(&clips(), OutputFormat::Yaml, |_| String::new()).unwrap();
        assert!(yaml.contains("title: Opening hook"));
    }

    #[tokio::test]
    async fn test_read_payload_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"clips": []}}"#).unwrap();
        let value = read_payload(file.path().to_str().unwrap()).await.unwrap();
        assert!(value["clips"].is_array());

        assert!(matches!(
            read_payload("/no/such/payload.json").await,
            Err(ReelError::PayloadRead { .. })
        ));
    }
}
