use crate::args::SummaryArgs;
use crate::commands::Out;
use crate::pipeline::Pipeline;
use crate::session::Session;
use crate::source::Source;
use crate::{Config, Result};
use anyhow::Context;

/// Reads the file in `args` and reports its totals, maxima and warnings as text.
pub async fn summary(config: Config, args: SummaryArgs) -> Result<Out<()>> {
    let session = Session::new(Pipeline::new(config.settings().clone()));
    let snapshot = session
        .upload(Some(Source::from_path(args.file(), args.kind())))
        .await?
        .context("The upload was superseded before it finished")?;
    Ok(Out::new_message(snapshot.summary().trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_summary() {
        let env = TestEnv::new().await;
        let csv = env.write_csv(
            "may.csv",
            "Date,Category,Amount\n05/01/2024,Grocery,$12.50\n05/01/2024,Pets,$3\n",
        );
        let out = summary(env.config(), SummaryArgs::new(&csv, None))
            .await
            .unwrap();
        assert_eq!(
            out.message(),
            "1 date\n\
            05/01/2024: Grocery $12.50\n\
            max: Grocery $12.50, Transportation $0.00, Go out to eat $0.00, Tithing $0.00\n\
            warning: row 2: category 'Pets' is not known, row dropped"
        );
    }
}
