use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use tilewall::geometry::Size;
use tilewall::persistence::{JsonFileStore, SqliteGalleryStore};
use tilewall::scanner::{FileScanner, ScanConfig};
use tilewall::{AddOrder, EditorOptions, GalleryEditor, LayoutKind, LayoutTree, SaveStatus};

const HELP: &str = "\
tilewall - lay out a directory of images as a gallery

USAGE:
  tilewall [OPTIONS] [DIR]

OPTIONS:
  --columns N       Grid columns (1-12)
  --row-height PX   Grid row height (80-800)
  --gap PX          Gap between tiles (0-64)
  --view KIND       grid | list | masonry | absolute
  --width PX        Container width [default: 1200]
  --height PX       Viewport height [default: 800]
  --db PATH         Gallery database [default: XDG config dir]
  --json PATH       Also write the configuration to a JSON file
  --name NAME       Gallery name in the database [default: default]
  --recursive       Scan DIR recursively
  --ordered         Append images in submission order
  --list            List stored galleries and exit
  -h, --help        Print this help
";

struct CliArgs {
    dir: Option<PathBuf>,
    columns: Option<u32>,
    row_height: Option<f32>,
    gap: Option<f32>,
    view: LayoutKind,
    width: f32,
    height: f32,
    db: Option<PathBuf>,
    json: Option<PathBuf>,
    name: String,
    recursive: bool,
    ordered: bool,
    list: bool,
}

impl CliArgs {
    fn parse() -> Result<Option<Self>> {
        let mut args = pico_args::Arguments::from_env();
        if args.contains(["-h", "--help"]) {
            print!("{}", HELP);
            return Ok(None);
        }

        let parsed = Self {
            columns: args.opt_value_from_str("--columns")?,
            row_height: args.opt_value_from_str("--row-height")?,
            gap: args.opt_value_from_str("--gap")?,
            view: args
                .opt_value_from_str("--view")?
                .unwrap_or_default(),
            width: args.opt_value_from_str("--width")?.unwrap_or(1200.0),
            height: args.opt_value_from_str("--height")?.unwrap_or(800.0),
            db: args.opt_value_from_str("--db")?,
            json: args.opt_value_from_str("--json")?,
            name: args
                .opt_value_from_str("--name")?
                .unwrap_or_else(|| "default".to_string()),
            recursive: args.contains("--recursive"),
            ordered: args.contains("--ordered"),
            list: args.contains("--list"),
            dir: args.opt_free_from_str()?,
        };

        let rest = args.finish();
        if !rest.is_empty() {
            warn!("Ignoring unexpected arguments: {:?}", rest);
        }
        Ok(Some(parsed))
    }
}

fn print_tree(tree: &LayoutTree) {
    println!(
        "{} view, {:.0}x{:.0}, {} tiles",
        tree.kind,
        tree.container.width,
        tree.container.height,
        tree.tiles.len()
    );
    for tile in tree.paint_order() {
        let c = tile.cell;
        println!(
            "  {:<8} #{:<3} at ({:>7.1}, {:>7.1}) size {:>7.1} x {:>7.1}  z={}{}",
            tile.id.to_string(),
            tile.index,
            c.x,
            c.y,
            c.width,
            c.height,
            tile.z_index,
            if tile.positioned { "" } else { "  (unpositioned)" }
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tilewall=info".parse()?),
        )
        .init();

    let Some(args) = CliArgs::parse().context("Invalid arguments (see --help)")? else {
        return Ok(());
    };

    let db = match &args.db {
        Some(path) => SqliteGalleryStore::open(path)?,
        None => SqliteGalleryStore::open_default()?,
    };

    if args.list {
        for gallery in db.list()? {
            println!("{:<24} {:>5} images", gallery.name, gallery.image_count);
        }
        return Ok(());
    }

    let seed = db.load(&args.name)?.unwrap_or_default();
    let options = EditorOptions {
        add_order: if args.ordered {
            AddOrder::Submission
        } else {
            AddOrder::Completion
        },
        view: args.view,
        ..Default::default()
    };
    let mut editor = GalleryEditor::from_config(seed, options);

    if let Some(columns) = args.columns {
        editor.set_columns(columns);
    }
    if let Some(row_height) = args.row_height {
        editor.set_row_height(row_height);
    }
    if let Some(gap) = args.gap {
        editor.set_gap(gap);
    }

    if let Some(dir) = &args.dir {
        let scanner = FileScanner::with_config(ScanConfig {
            recursive: args.recursive,
            ..Default::default()
        });
        let files = scanner.scan(dir).await?;
        let submitted = files.len();
        editor.add_files(files);
        let added = editor.settle().await;
        info!(
            "Added {} of {} files ({} rejected)",
            added.len(),
            submitted,
            submitted - added.len()
        );
    }

    print_tree(&editor.render(Size::new(args.width, args.height)));

    if editor.save(&db.slot(args.name.as_str())).await == SaveStatus::Failed {
        anyhow::bail!("Could not save gallery '{}'", args.name);
    }
    if let Some(path) = &args.json {
        if editor.save(&JsonFileStore::new(path)).await == SaveStatus::Failed {
            anyhow::bail!("Could not write {:?}", path);
        }
        info!("Wrote {:?}", path);
    }

    Ok(())
}
