use clap::Parser;
use lagrangian_hydro::{
    gas_law::GasLaw, ics_from_config, BoundaryMap, Engine, InitialConditionsFn, Mesh, Space,
    TimeConstants,
};
use std::{error::Error, fs, path};
use yaml_rust::YamlLoader;

struct Config {
    gas_law: GasLaw,
    time_constants: TimeConstants,
    engine: Engine,
    mesh: Mesh,
    boundaries: BoundaryMap,
    ics: InitialConditionsFn,
}

impl Config {
    fn parse(file: path::PathBuf) -> Result<Self, Box<dyn Error>> {
        let docs = YamlLoader::load_from_str(&fs::read_to_string(file)?)?;
        let config_yml = &docs[0];
        let time_integration = &config_yml["time_integration"];

        Ok(Self {
            gas_law: GasLaw::init(&config_yml["hydrodynamics"])?,
            time_constants: TimeConstants::init(&time_integration["cfl"])?,
            engine: Engine::init(time_integration, &config_yml["engine"])?,
            mesh: Mesh::init(&config_yml["mesh"])?,
            boundaries: BoundaryMap::init(&config_yml["boundaries"])?,
            ics: ics_from_config(&config_yml["initial_conditions"])?,
        })
    }
}

#[derive(Parser)]
pub struct Cli {
    /// The path to the config file to read
    #[clap(parse(from_os_str))]
    pub config: path::PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // parse command line parameters
    let args = Cli::parse();

    // read configuration
    let config = Config::parse(args.config)?;
    let Config {
        gas_law,
        time_constants,
        mut engine,
        mesh,
        boundaries,
        ics,
    } = config;

    // Setup simulation
    log::info!(
        "Mesh with {} cells, {} vertices and {} corners",
        mesh.num_cells(),
        mesh.num_vertices(),
        mesh.num_corners()
    );
    let mut space = Space::new(mesh, gas_law, boundaries, time_constants);
    space.initial_conditions(|x, _| ics(x));

    // run
    engine.run(&mut space)?;

    println!("Done!");
    Ok(())
}
