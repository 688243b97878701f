use crate::args::{FacesArgs, OutputFormat};
use crate::commands::Out;
use crate::model::Warning;
use crate::pipeline::{Faces, FeatureRanges, GlobalMaxTable, Pipeline, StatementFace};
use crate::render::{render_gallery, render_statement};
use crate::session::{Session, Snapshot};
use crate::source::Source;
use crate::{utils, Config, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// The face parameters that were drawn, as written by `--format json`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Drawn {
    Ledger {
        faces: Faces,
        max: GlobalMaxTable,
        warnings: Vec<Warning>,
    },
    Statement(StatementFace),
}

impl Drawn {
    fn count(&self) -> usize {
        match self {
            Drawn::Ledger { faces, .. } => faces.len(),
            Drawn::Statement(_) => 1,
        }
    }

    fn warnings(&self) -> &[Warning] {
        match self {
            Drawn::Ledger { warnings, .. } => warnings,
            Drawn::Statement(face) => &face.warnings,
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The parameters of `snapshot` and its SVG rendering.
fn draw(snapshot: &Snapshot, ranges: &FeatureRanges) -> (Drawn, String) {
    match snapshot {
        Snapshot::Ledger { ingestion, faces } => (
            Drawn::Ledger {
                faces: faces.clone(),
                max: ingestion.bounds.clone(),
                warnings: ingestion.warnings.clone(),
            },
            render_gallery(faces, &ingestion.table, ranges),
        ),
        Snapshot::Statement(face) => (Drawn::Statement(face.clone()), render_statement(face)),
    }
}

/// Reads the file in `args`, draws its faces and writes them to the output path.
pub async fn faces(config: Config, args: FacesArgs) -> Result<Out<Drawn>> {
    let out = args.out();
    if same_file(&out, args.file()) {
        bail!(
            "The output path '{}' is the input file, use --out to write somewhere else",
            out.display()
        )
    }
    let session = Session::new(Pipeline::new(config.settings().clone()));
    let snapshot = session
        .upload(Some(Source::from_path(args.file(), args.kind())))
        .await?
        .context("The upload was superseded before it finished")?;

    let (drawn, svg) = draw(&snapshot, &session.pipeline().settings().features);
    let contents = match args.format() {
        OutputFormat::Svg => svg,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&drawn).context("Unable to serialize the faces")?
        }
    };
    utils::write(&out, contents).await?;
    debug!("Wrote {} output to {}", args.format(), out.display());

    let count = drawn.count();
    let message = format!(
        "Drew {count} {} to {} with {} warnings",
        if count == 1 { "face" } else { "faces" },
        out.display(),
        drawn.warnings().len()
    );
    Ok(Out::new(message, drawn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InputKind;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_faces_svg() {
        let env = TestEnv::new().await;
        let csv = env.write_csv("export.csv", crate::test::SAMPLE_CSV);
        let out = faces(env.config(), FacesArgs::new(&csv, None, OutputFormat::Svg, None))
            .await
            .unwrap();
        assert_eq!(out.structure().map(Drawn::count), Some(2));

        let svg = utils::read(&csv.with_extension("svg")).await.unwrap();
        assert_eq!(svg.matches("<g class='face'").count(), 2);
    }

    #[tokio::test]
    async fn test_faces_json() {
        let env = TestEnv::new().await;
        let csv = env.write_csv("export.csv", crate::test::SAMPLE_CSV);
        let json_path = env.path("faces.json");
        faces(
            env.config(),
            FacesArgs::new(&csv, Some(json_path.clone()), OutputFormat::Json, None),
        )
        .await
        .unwrap();

        let value: serde_json::Value = utils::deserialize(&json_path).await.unwrap();
        assert_eq!(value["max"]["Grocery"], 300.0);
        assert_eq!(value["faces"]["01/02/2024"]["faceRadiusY"], 120.0);
        assert_eq!(value["faces"]["01/01/2024"]["faceRadiusY"], 100.0);
    }

    #[tokio::test]
    async fn test_statement_json_keeps_text() {
        let env = TestEnv::new().await;
        let session = Session::new(Pipeline::new(env.config().settings().clone()));
        let snapshot = session
            .upload(Some(Source::Text("Checking\nBalance: 500".to_string())))
            .await
            .unwrap()
            .unwrap();
        let (drawn, svg) = draw(&snapshot, &session.pipeline().settings().features);
        assert!(svg.contains("<title>Balance $500.00</title>"));

        let value = serde_json::to_value(&drawn).unwrap();
        assert_eq!(value["balance"], 500.0);
        assert_eq!(value["text"], "Checking\nBalance: 500");
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite_input() {
        let env = TestEnv::new().await;
        let json = env.write_csv("data.json", crate::test::SAMPLE_CSV);
        let args = FacesArgs::new(&json, None, OutputFormat::Json, Some(InputKind::Csv));
        let err = faces(env.config(), args).await.unwrap_err();
        assert!(err.to_string().contains("--out"));
        assert_eq!(utils::read(&json).await.unwrap(), crate::test::SAMPLE_CSV);

        let dotted = env.path(".").join("data.json");
        let args = FacesArgs::new(&json, Some(dotted), OutputFormat::Json, Some(InputKind::Csv));
        assert!(faces(env.config(), args).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_input() {
        let env = TestEnv::new().await;
        let result = faces(
            env.config(),
            FacesArgs::new(env.path("nope.csv"), None, OutputFormat::Svg, None),
        )
        .await;
        assert!(result.is_err());
    }
}
