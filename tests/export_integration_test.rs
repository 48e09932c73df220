//! End-to-end export tests
//!
//! A small catalog and texture pack are written to a temporary directory and
//! exported through the host loop exactly as the `export` command does.

use image::{Rgba, RgbaImage};
use serde_json::{json, Value};
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;
use wikigen::adapters::render::SpriteRenderer;
use wikigen::config::WikigenConfig;
use wikigen::core::host::{ExportHost, SUMMARY_FILE};
use wikigen::domain::Catalog;

fn catalog_json() -> Value {
    json!({
        "items": [
            {"id": "minecraft:stick", "name": "Stick"},
            {"id": "minecraft:furnace", "name": "Furnace", "block": "minecraft:furnace"},
            {"id": "minecolonies:ghost", "name": "Ghost"}
        ],
        "blocks": [
            {
                "id": "minecraft:furnace",
                "name": "Furnace",
                "properties": [
                    {"name": "facing", "kind": "enum", "values": ["north", "south"]},
                    {"name": "lit", "kind": "boolean", "values": ["false", "true"]}
                ],
                "default_state": {"facing": "south"}
            }
        ],
        "item_tags": {
            "minecraft:planks": ["minecraft:oak_planks", "minecraft:birch_planks"]
        },
        "languages": {
            "en_us": {"item.minecraft.stick": "Stick", "block.minecraft.furnace": "Furnace"},
            "en_gb": {"item.minecraft.stick": "Stick (GB)"}
        },
        "configurations": [
            {
                "mod_id": "minecolonies",
                "display_name": "MineColonies",
                "config_type": "server",
                "entries": [
                    {
                        "path": ["gameplay", "maxCitizens"],
                        "default": 25,
                        "translation_key": "minecolonies.config.maxcitizens",
                        "comment": "Max citizens per colony\nRange: 1 ~ 500",
                        "needs_restart": true
                    }
                ]
            },
            {
                "mod_id": "jei",
                "config_type": "client",
                "entries": [{"path": ["x"], "default": true}]
            }
        ],
        "research": {
            "minecolonies:civilian/stamina": {"parentResearch": "minecolonies:civilian/root"},
            "minecolonies:civilian": {"branch-name": "Civilian", "base-time": 1},
            "minecolonies:effects/speed": {"effect": "speed", "levels": [1, 2]}
        },
        "citizen_names": {
            "minecolonies:default": {"male_firstname": ["Ada"], "surnames": ["Lovelace"]}
        },
        "recipes": {
            "minecraft:crafting/stick": {
                "type": "minecraft:crafting_shaped",
                "pattern": ["#", "#"],
                "result": {"item": "minecraft:stick", "count": 4}
            },
            "minecolonies:sawmill/stick": {"type": "minecolonies:crafter", "output": "minecraft:stick"}
        }
    })
}

fn write_texture(assets: &Path, namespace: &str, path: &str, rgba: [u8; 4]) {
    let file = assets
        .join(namespace)
        .join("textures")
        .join(format!("{path}.png"));
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(4, 4, Rgba(rgba)).save(file).unwrap();
}

fn read_json(path: &Path) -> Value {
    let contents = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&contents).unwrap()
}

struct Fixture {
    _dir: TempDir,
    config: WikigenConfig,
    output: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets");
    write_texture(&assets, "minecraft", "item/stick", [140, 100, 60, 255]);
    write_texture(&assets, "minecraft", "block/furnace", [120, 120, 120, 255]);

    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(&catalog_path, catalog_json().to_string()).unwrap();

    let output = dir.path().join("wiki");
    let mut config = WikigenConfig::default();
    config.export.output_dir = output.to_string_lossy().to_string();
    config.export.catalog = catalog_path.to_string_lossy().to_string();
    config.export.assets_dir = assets.to_string_lossy().to_string();
    config.images.item_size = 16;
    config.images.block_size = 16;
    config.images.batch_size = 2;
    config.host.warmup_ticks = 2;
    config.host.frame_interval_ms = 0;

    Fixture {
        _dir: dir,
        config,
        output,
    }
}

fn run(config: &WikigenConfig) -> wikigen::core::scheduler::RunSummary {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let catalog = Catalog::load(&config.export.catalog).unwrap();
    let renderer = Rc::new(SpriteRenderer::new(&config.export.assets_dir));
    ExportHost::initialize(config, catalog, renderer, runtime.handle().clone())
        .unwrap()
        .run()
        .unwrap()
}

#[test]
fn test_full_export_writes_every_registry() {
    let fixture = fixture();
    let summary = run(&fixture.config);
    let out = &fixture.output;

    assert!(summary.is_successful(), "{summary:?}");
    assert_eq!(summary.active_jobs, 13);
    // Two non-block items plus four furnace states
    assert_eq!(summary.units_total, 6);
    assert_eq!(summary.units_completed, 6);
    // The ghost item has no texture: processed, not written
    assert_eq!(summary.units_skipped, 1);
    let item_images = summary
        .jobs
        .iter()
        .find(|job| job.job == "Item Images")
        .unwrap();
    assert_eq!((item_images.written, item_images.skipped), (1, 1));

    assert_eq!(
        read_json(&out.join("items/minecraft/stick.json")),
        json!({"name": "Stick"})
    );
    assert_eq!(
        read_json(&out.join("items/minecraft/furnace.json"))["block-id"],
        "minecraft:furnace"
    );
    assert_eq!(
        read_json(&out.join("blocks/minecraft/furnace.json")),
        json!({"name": "Furnace", "defaultstate": 2})
    );

    let states = read_json(&out.join("block_states/minecraft/furnace.json"));
    assert_eq!(states["blockstates"].as_array().unwrap().len(), 4);

    assert_eq!(
        read_json(&out.join("item_tags/minecraft/planks.json")),
        json!(["minecraft:oak_planks", "minecraft:birch_planks"])
    );

    let lang = read_json(&out.join("lang/en_us.json"));
    assert_eq!(lang["block.minecraft.furnace"], "Furnace");
    assert_eq!(lang["item.minecraft.stick"], "Stick");

    let config = read_json(&out.join("config/minecolonies/configuration.json"));
    assert_eq!(config["name"], "MineColonies");
    assert_eq!(config["types"][0]["type"], "SERVER");
    let leaf = &config["types"][0]["values"][0]["children"][0];
    assert_eq!(leaf["name"], "maxCitizens");
    assert_eq!(leaf["min"], 1.0);
    assert_eq!(leaf["max"], 500.0);
    assert!(!out.join("config/jei").exists());

    assert!(out.join("research/minecolonies/stamina.json").exists());
    assert!(out.join("research_trees/minecolonies/civilian.json").exists());
    assert!(out.join("research_effects/minecolonies/speed.json").exists());
    assert!(!out.join("research/minecolonies/speed.json").exists());

    assert_eq!(
        read_json(&out.join("citizen_names/minecolonies/default.json"))["surnames"],
        json!(["Lovelace"])
    );

    assert_eq!(
        read_json(&out.join("recipes/minecraft/stick.json")),
        catalog_json()["recipes"]["minecraft:crafting/stick"]
    );
    assert!(out.join("recipes/minecolonies/stick.json").exists());
    let recipes = summary
        .jobs
        .iter()
        .find(|job| job.job == "Recipes Data")
        .unwrap();
    assert_eq!(recipes.written, 2);

    let written = read_json(&out.join(SUMMARY_FILE));
    assert_eq!(written["units_skipped"], 1);
}

#[test]
fn test_full_export_renders_images() {
    let fixture = fixture();
    run(&fixture.config);
    let out = &fixture.output;

    let stick = image::open(out.join("item_images/minecraft/stick.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(stick.dimensions(), (16, 16));
    assert_eq!(stick.get_pixel(0, 0).0, [140, 100, 60, 255]);

    // Block items are only rendered as block states
    assert!(!out.join("item_images/minecraft/furnace.png").exists());
    // Missing textures render nothing
    assert!(!out.join("item_images/minecolonies/ghost.png").exists());

    for state in [
        "facing=north,lit=false",
        "facing=north,lit=true",
        "facing=south,lit=false",
        "facing=south,lit=true",
    ] {
        let path = out.join(format!("block_images/minecraft/furnace/{state}.png"));
        let image = image::open(&path)
            .unwrap_or_else(|e| panic!("failed to open {}: {e}", path.display()))
            .to_rgba8();
        assert_eq!(image.dimensions(), (16, 16));
    }
}

#[test]
fn test_disabled_jobs_write_nothing_and_stale_output_is_removed() {
    let mut fixture = fixture();
    let stale = fixture.output.join("items/minecraft/removed.json");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "{}").unwrap();

    fixture
        .config
        .jobs
        .restrict_to(&["items".to_string()])
        .unwrap();
    let summary = run(&fixture.config);

    assert_eq!(summary.active_jobs, 1);
    assert_eq!(summary.inactive_jobs, 12);
    assert!(!stale.exists());
    assert!(fixture.output.join("items/minecraft/stick.json").exists());
    assert!(!fixture.output.join("item_images").exists());
    assert!(!fixture.output.join("lang").exists());
    assert!(!fixture.output.join("recipes").exists());
}
