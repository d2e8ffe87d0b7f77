use crate::collection::{resolve_collection_name, CollectionName};
use crate::log::PrepareLog;
use crate::CoreError;
use saltbox_sandbox::{
    copy_file, copy_filtered, ensure_dir, instance_file_root, instance_pillar_root,
    write_raw_file, CopyFilter, SandboxLayout, EXTENSION_DIRS,
};
use saltbox_schema::{plain_key_name, render_normalized, Configuration};
use std::fs;
use std::path::Path;

/// Copy the configured fixture directory into `<sandbox>/data`.
pub fn prepare_data(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<usize, CoreError> {
    log.info("Preparing data");
    let Some(data_path) = &config.data_path else {
        log.debug("no data_path configured, skipping");
        return Ok(0);
    };
    log.debug(&format!("Using data from {}", data_path.display()));

    let data_dir = layout.data_dir();
    ensure_dir(&data_dir)?;
    let filter = CopyFilter::new(config.salt_copy_filter.as_slice())?;
    Ok(copy_filtered(data_path, &data_dir, &filter)?)
}

/// The minion configuration document.
///
/// Hand-templated rather than rendered so the layout is exact: one
/// `file_roots` and one `pillar_roots` entry, each keyed by `salt_env` and
/// listing a single path rooted at `root_path`.
pub fn minion_config_content(config: &Configuration) -> String {
    let env = &config.salt_env;
    let file_root = instance_file_root(config);
    let pillar_root = instance_pillar_root(config);
    format!(
        "state_top: top.sls\n\
         \n\
         file_client: local\n\
         \n\
         file_roots:\n {env}:\n   - {file_root}\n\
         \n\
         pillar_roots:\n {env}:\n   - {pillar_root}\n"
    )
}

pub fn prepare_minion(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<usize, CoreError> {
    log.info("Preparing salt-minion");
    log.debug(&format!("sandbox is {}", layout.root().display()));

    let minion_path = layout.minion_config(config);
    write_raw_file(&minion_path, minion_config_content(config))?;
    Ok(1)
}

/// Write the state top file, either copied raw from `state_top_file` or
/// rendered from the inline `state_top` structure.
pub fn prepare_state_top(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<usize, CoreError> {
    log.info("Preparing state_top");
    let state_top_path = layout.state_top(config);

    if config.state_top_from_file {
        log.debug(&format!(
            "loading state top from {}",
            config.state_top_file.display()
        ));
        let content = fs::read(&config.state_top_file)?;
        write_raw_file(&state_top_path, content)?;
    } else {
        let content = render_normalized(&config.state_top)?;
        log.debug(&format!("Rendered state top:\n{content}"));
        write_raw_file(&state_top_path, content)?;
    }
    Ok(1)
}

/// Write inline pillars (rendered) and file pillars (copied verbatim) under
/// the pillar root. File pillars are written second, so they win when a name
/// appears in both maps.
pub fn prepare_pillars(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<usize, CoreError> {
    log.info(&format!(
        "Preparing pillars into {}",
        config.salt_pillar_root
    ));
    log.debug(&format!("Pillars Hash: {:?}", config.pillars));

    if config.pillars.is_none() && config.pillars_from_files.is_none() {
        return Ok(0);
    }

    let mut written = 0;
    for (name, contents) in config.pillars.iter().flatten() {
        let name = plain_key_name(name);
        let pillar = render_normalized(contents)?;
        let pillar_path = layout.pillar_path(config, name);
        log.debug(&format!("Rendered pillar yaml for {name}:\n {pillar}"));
        write_raw_file(&pillar_path, pillar)?;
        written += 1;
    }

    // Rendering would reflow multi-line strings, so these are copied as-is.
    for (name, src) in config.pillars_from_files.iter().flatten() {
        let name = plain_key_name(name);
        log.debug(&format!(
            "Copying external pillar: {name}, {}",
            src.display()
        ));
        copy_file(src, &layout.pillar_path(config, name))?;
        written += 1;
    }
    Ok(written)
}

pub fn prepare_grains(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<usize, CoreError> {
    log.info(&format!(
        "Preparing grains into {}/grains",
        config.salt_config
    ));
    log.debug(&format!("Grains Hash: {:?}", config.grains));
    let Some(grains) = &config.grains else {
        return Ok(0);
    };

    let grains_path = layout.grains_file(config);
    log.debug(&format!("sandbox_grains_path: {}", grains_path.display()));
    write_raw_file(&grains_path, render_normalized(grains)?)?;
    Ok(1)
}

/// Copy `source/formula` into the file root, plus any of the Python extension
/// directories present directly under `source`.
pub fn prepare_formula(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
    source: &Path,
    formula: &str,
) -> Result<usize, CoreError> {
    log.info(&format!(
        "Preparing formula: {formula} from {}",
        source.display()
    ));
    let filter = CopyFilter::new(config.salt_copy_filter.as_slice())?;

    let formula_dir = layout.formula_dir(config, formula);
    ensure_dir(&formula_dir)?;
    let mut written = copy_filtered(&source.join(formula), &formula_dir, &filter)?;

    for extension in EXTENSION_DIRS {
        let src = source.join(extension);
        if src.is_dir() {
            log.debug(&format!("prepare_formula: {} exists, copying..", src.display()));
            let extension_dir = layout.extension_dir(config, extension);
            ensure_dir(&extension_dir)?;
            written += copy_filtered(&src, &extension_dir, &filter)?;
        } else {
            log.debug(&format!(
                "prepare_formula: {} doesn't exist, skipping.",
                src.display()
            ));
        }
    }
    Ok(written)
}

pub fn prepare_dependencies(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<usize, CoreError> {
    let mut written = 0;
    for dependency in &config.dependencies {
        log.debug(&format!(
            "Preparing dependency {} from {}",
            dependency.name,
            dependency.path.display()
        ));
        written += prepare_formula(config, layout, log, &dependency.path, &dependency.name)?;
    }
    Ok(written)
}

/// Copy the project tree into the file root under the resolved collection name.
pub fn prepare_state_collection(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<usize, CoreError> {
    log.info("Preparing state collection");

    let collection = resolve_collection_name(
        config.collection_name.as_deref(),
        config.formula.as_deref(),
    );
    match &collection {
        CollectionName::FileRoot => log.info(
            "neither collection_name or formula have been set, assuming this is a pre-built collection",
        ),
        CollectionName::Formula(formula) => {
            log.debug(&format!("collection_name not set, using {formula}"));
        }
        CollectionName::Explicit(_) => {}
    }
    log.debug(&format!("collection_name = {}", collection.subpath()));

    let collection_dir = layout.collection_dir(config, collection.subpath());
    ensure_dir(&collection_dir)?;
    let filter = CopyFilter::new(config.salt_copy_filter.as_slice())?;
    Ok(copy_filtered(&config.kitchen_root, &collection_dir, &filter)?)
}

/// Populate the file root: the project as a state collection, or the project's
/// formula followed by its dependencies.
pub fn prepare_states(
    config: &Configuration,
    layout: &SandboxLayout,
    log: &dyn PrepareLog,
) -> Result<usize, CoreError> {
    match &config.formula {
        Some(formula) if !config.state_collection && !config.is_file_root => {
            let written = prepare_formula(config, layout, log, &config.kitchen_root, formula)?;
            Ok(written + prepare_dependencies(config, layout, log)?)
        }
        _ => prepare_state_collection(config, layout, log),
    }
}
