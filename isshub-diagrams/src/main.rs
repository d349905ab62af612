//! isshub 领域图生成器
//!
//! 为每个上下文在输出目录中写出两个 Graphviz 文件：
//! - `<context>-entities.dot`：实体、枚举及其关系
//! - `<context>-repositories.dot`：仓储及其操作
//!
use anyhow::{Context, Result, bail};
use clap::Parser;
use isshub_domain::contexts;
use isshub_domain::diagram::ContextDiagram;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "isshub-diagrams",
    about = "Render isshub domain contexts as Graphviz files",
    version
)]
struct Args {
    #[arg(
        long,
        short,
        env = "ISSHUB_DIAGRAMS_OUTPUT",
        value_name = "DIR",
        default_value = ".",
        help = "Directory receiving the generated .dot files"
    )]
    output: PathBuf,

    #[arg(
        long,
        value_name = "NAME",
        help = "Only render these contexts (repeatable); all contexts by default"
    )]
    context: Vec<String>,
}

fn main() -> Result<()> {
    // stdout 留给调用方，日志写到 stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let diagrams = select(contexts::diagrams(), &args.context)?;
    let written = write_diagrams(&args.output, &diagrams)?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

/// 按名称筛选上下文；名称未知时报错
fn select(diagrams: Vec<ContextDiagram>, names: &[String]) -> Result<Vec<ContextDiagram>> {
    if names.is_empty() {
        return Ok(diagrams);
    }
    for name in names {
        if !diagrams.iter().any(|d| d.name() == name) {
            let known: Vec<_> = diagrams.iter().map(|d| d.name()).collect();
            bail!("unknown context {name:?} (known: {})", known.join(", "));
        }
    }
    Ok(diagrams
        .into_iter()
        .filter(|d| names.iter().any(|name| name == d.name()))
        .collect())
}

fn write_diagrams(output: &Path, diagrams: &[ContextDiagram]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    let mut written = Vec::with_capacity(diagrams.len() * 2);
    for diagram in diagrams {
        let entities = diagram
            .render_entities()
            .with_context(|| format!("failed to render entities of context {}", diagram.name()))?;
        let repositories = diagram.render_repositories();

        for (kind, content) in [("entities", entities), ("repositories", repositories)] {
            let path = output.join(format!("{}-{kind}.dot", diagram.name()));
            fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(context = diagram.name(), path = %path.display(), "diagram written");
            written.push(path);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 测试每个上下文写出两个文件
    #[test]
    fn test_write_diagrams() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("diagrams");
        let written = write_diagrams(&output, &contexts::diagrams()).unwrap();
        assert_eq!(
            written,
            [
                output.join("code_repository-entities.dot"),
                output.join("code_repository-repositories.dot"),
            ]
        );

        let entities = fs::read_to_string(&written[0]).unwrap();
        assert!(entities.starts_with("digraph domain_context_entities {"));
        let repositories = fs::read_to_string(&written[1]).unwrap();
        assert!(repositories.contains("InMemoryRepositoryRepository"));
    }

    // 测试按名称筛选上下文
    #[test]
    fn test_select() {
        let all = select(contexts::diagrams(), &[]).unwrap();
        assert_eq!(all.len(), contexts::diagrams().len());

        let names = vec!["code_repository".to_string()];
        let picked = select(contexts::diagrams(), &names).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name(), "code_repository");

        let err = select(contexts::diagrams(), &["billing".to_string()]).unwrap_err();
        assert!(err.to_string().contains("unknown context \"billing\""));
    }

    // 测试命令行参数
    #[test]
    fn test_args() {
        let args = Args::try_parse_from([
            "isshub-diagrams",
            "--output",
            "out",
            "--context",
            "code_repository",
        ])
        .unwrap();
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.context, ["code_repository"]);
    }
}
