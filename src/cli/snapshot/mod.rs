//! Snapshot command - offline maintenance of the semantic cache files

use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::domain::{CacheSnapshot, SnapshotStore};
use crate::infrastructure::semantic_cache::FileSnapshotStore;

#[derive(Args)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: SnapshotCommand,
}

#[derive(Subcommand)]
pub enum SnapshotCommand {
    /// Load and validate the index and metadata pair
    Verify,

    /// Print cached entries by position
    Inspect {
        /// Maximum number of entries to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Truncate an out-of-step pair to the entries present in both files
    Repair {
        /// Confirm rewriting the files
        #[arg(long)]
        yes: bool,
    },

    /// Delete the index and metadata files
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(args: SnapshotArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let store = FileSnapshotStore::from_config(&config.semantic_cache);
    let dimensions = config.semantic_cache.dimensions;

    let output = match args.command {
        SnapshotCommand::Verify => verify(&store, dimensions).await?,
        SnapshotCommand::Inspect { limit } => inspect(&store, dimensions, limit).await?,
        SnapshotCommand::Repair { yes } => repair(&store, dimensions, yes).await?,
        SnapshotCommand::Reset { yes } => reset(&store, yes).await?,
    };

    for line in output {
        println!("{}", line);
    }

    Ok(())
}

async fn load_valid(
    store: &dyn SnapshotStore,
    dimensions: usize,
) -> anyhow::Result<Option<CacheSnapshot>> {
    let snapshot = store.load().await?;

    if let Some(snapshot) = &snapshot {
        snapshot.validate(dimensions)?;
    }

    Ok(snapshot)
}

async fn verify(store: &dyn SnapshotStore, dimensions: usize) -> anyhow::Result<Vec<String>> {
    let Some(snapshot) = load_valid(store, dimensions).await? else {
        return Ok(vec![format!("No snapshot at {}", store.describe())]);
    };

    Ok(vec![
        format!("Snapshot OK: {}", store.describe()),
        format!("  dimensions: {}", snapshot.index.dimensions()),
        format!("  vectors:    {}", snapshot.index.len()),
        format!("  prompts:    {}", snapshot.metadata.prompts.len()),
        format!("  keys:       {}", snapshot.metadata.keys.len()),
    ])
}

async fn inspect(
    store: &dyn SnapshotStore,
    dimensions: usize,
    limit: usize,
) -> anyhow::Result<Vec<String>> {
    let Some(snapshot) = load_valid(store, dimensions).await? else {
        return Ok(vec![format!("No snapshot at {}", store.describe())]);
    };

    let mut lines: Vec<String> = snapshot
        .metadata
        .keys
        .iter()
        .zip(&snapshot.metadata.prompts)
        .enumerate()
        .take(limit)
        .map(|(position, (key, prompt))| {
            format!("{:>5}  {:<14} {}", position, key, single_line(prompt, 100))
        })
        .collect();

    if snapshot.len() > limit {
        lines.push(format!("... {} more", snapshot.len() - limit));
    }

    Ok(lines)
}

async fn repair(
    store: &dyn SnapshotStore,
    dimensions: usize,
    yes: bool,
) -> anyhow::Result<Vec<String>> {
    let Some(mut snapshot) = store.load().await? else {
        return Ok(vec![format!("No snapshot at {}", store.describe())]);
    };

    if snapshot.index.dimensions() != dimensions {
        anyhow::bail!(
            "Snapshot holds {}-dimensional vectors, cache is configured for {}; use reset instead",
            snapshot.index.dimensions(),
            dimensions
        );
    }

    let dropped = snapshot.truncate_to_common_prefix();

    if dropped == 0 {
        return Ok(vec![format!("Snapshot already consistent: {}", store.describe())]);
    }

    if !yes {
        anyhow::bail!(
            "Refusing to drop {} trailing items from {} without --yes",
            dropped,
            store.describe()
        );
    }

    store.save(&snapshot).await?;

    Ok(vec![format!(
        "Repaired {}: kept {} entries, dropped {} trailing items",
        store.describe(),
        snapshot.len(),
        dropped
    )])
}

async fn reset(store: &dyn SnapshotStore, yes: bool) -> anyhow::Result<Vec<String>> {
    if !yes {
        anyhow::bail!("Refusing to delete {} without --yes", store.describe());
    }

    let line = if store.reset().await? {
        format!("Deleted {}", store.describe())
    } else {
        format!("Nothing to delete at {}", store.describe())
    };

    Ok(vec![line])
}

fn single_line(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if flat.chars().count() <= max_chars {
        flat
    } else {
        let head: String = flat.chars().take(max_chars).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SemanticIndex, SnapshotMetadata};
    use crate::infrastructure::semantic_cache::InMemorySnapshotStore;

    fn snapshot(entries: usize) -> CacheSnapshot {
        let mut index = SemanticIndex::new(2);
        let mut metadata = SnapshotMetadata::default();

        for i in 0..entries {
            index.add(&[1.0, 0.0]).unwrap();
            metadata.prompts.push(format!("pregunta {}", i));
            metadata.keys.push(format!("answer:{}", i));
        }

        CacheSnapshot::new(index, metadata)
    }

    #[tokio::test]
    async fn test_verify_counts() {
        let store = InMemorySnapshotStore::with_snapshot(snapshot(3));

        let lines = verify(&store, 2).await.unwrap();

        assert!(lines[0].starts_with("Snapshot OK"));
        assert!(lines.iter().any(|l| l.contains("vectors:    3")));
    }

    #[tokio::test]
    async fn test_verify_missing_snapshot() {
        let store = InMemorySnapshotStore::new();

        let lines = verify(&store, 2).await.unwrap();

        assert!(lines[0].starts_with("No snapshot"));
    }

    #[tokio::test]
    async fn test_verify_rejects_mismatched_pair() {
        let mut broken = snapshot(2);
        broken.metadata.keys.pop();
        let store = InMemorySnapshotStore::with_snapshot(broken);

        assert!(verify(&store, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_inspect_respects_limit() {
        let store = InMemorySnapshotStore::with_snapshot(snapshot(5));

        let lines = inspect(&store, 2, 2).await.unwrap();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("answer:0"));
        assert!(lines[1].contains("pregunta 1"));
        assert_eq!(lines[2], "... 3 more");
    }

    #[tokio::test]
    async fn test_reset_requires_confirmation() {
        let store = InMemorySnapshotStore::with_snapshot(snapshot(1));

        assert!(reset(&store, false).await.is_err());
        assert!(store.current().is_some());

        let lines = reset(&store, true).await.unwrap();
        assert!(lines[0].starts_with("Deleted"));
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_repair_truncates_out_of_step_pair() {
        let mut broken = snapshot(3);
        broken.metadata.prompts.pop();
        broken.metadata.keys.pop();
        let store = InMemorySnapshotStore::with_snapshot(broken);

        assert!(repair(&store, 2, false).await.is_err());
        assert_eq!(store.current().unwrap().index.len(), 3);

        let lines = repair(&store, 2, true).await.unwrap();
        assert!(lines[0].starts_with("Repaired"));

        let repaired = store.current().unwrap();
        assert_eq!(repaired.len(), 2);
        assert!(repaired.validate(2).is_ok());
        assert!(verify(&store, 2).await.is_ok());
    }

    #[tokio::test]
    async fn test_repair_leaves_consistent_pair() {
        let store = InMemorySnapshotStore::with_snapshot(snapshot(2));

        let lines = repair(&store, 2, false).await.unwrap();

        assert!(lines[0].starts_with("Snapshot already consistent"));
        assert_eq!(store.current().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_repair_rejects_dimension_mismatch() {
        let store = InMemorySnapshotStore::with_snapshot(snapshot(1));

        assert!(repair(&store, 768, true).await.is_err());
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("hola\nmundo", 20), "hola mundo");
        assert_eq!(single_line("¿Qué datos?", 4), "¿Qué…");
    }
}
