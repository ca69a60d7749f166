use common::{
    get_engine, get_mesh, get_space, get_time_constants, load, pulse, symmetry_walls, BOX_CONFIG,
    CONFIG, ENGINE_CONFIG, TIME_INTEGRATION_CONFIG,
};
use float_cmp::assert_approx_eq;
use glam::DVec3;
use lagrangian_hydro::{
    gas_law::GasLaw, ics_from_config, ics_from_preset, physical_quantities::Primitives,
    BoundaryCondition, BoundaryMap, Engine, HydroError, Mesh, Prescribed, Space, TimeConstants,
};

mod common;

#[test]
fn test_run_from_config() {
    let config = load(CONFIG);
    let time_integration = &config["time_integration"];
    let mut engine = Engine::init(time_integration, &config["engine"]).unwrap();
    let mesh = Mesh::init(&config["mesh"]).unwrap();
    let boundaries = BoundaryMap::init(&config["boundaries"]).unwrap();
    let ics = ics_from_config(&config["initial_conditions"]).unwrap();
    let mut space = Space::new(
        mesh,
        GasLaw::init(&config["hydrodynamics"]).unwrap(),
        boundaries,
        TimeConstants::init(&time_integration["cfl"]).unwrap(),
    );
    space.initial_conditions(|x, _| ics(x));
    assert_approx_eq!(
        f64,
        space.conservation_totals().mass(),
        0.28125,
        epsilon = 1e-14
    );

    let energy = space.conservation_totals().energy();
    engine.run(&mut space).unwrap();
    assert_eq!(engine.step_count(), 20);
    assert!(space.time() > 20. * 1e-4);
    assert!(space.time() < 0.01);
    assert_approx_eq!(
        f64,
        space.conservation_totals().energy(),
        energy,
        epsilon = 1e-11
    );
    assert_approx_eq!(f64, space.mesh().total_volume(), 0.5, epsilon = 1e-12);
}

#[test]
fn test_run_until_end_time() {
    let mut engine = get_engine(
        "initial_time_step: 1e-3\nt_end: 2e-3\nrunner: \"ForwardEuler\"",
        ENGINE_CONFIG,
    );
    // Weak pulse, so that the growth criterion binds
    let mut space = get_space(get_mesh(BOX_CONFIG), symmetry_walls(3), |x| {
        let pressure = if x.distance(DVec3::splat(0.5)) < 0.25 { 1.1 } else { 1. };
        Primitives::new(1., DVec3::ZERO, pressure)
    });
    // Start from the configured time step
    space.set_time_step(0.);
    engine.run(&mut space).unwrap();
    // 1.01e-3, then 1.0201e-3
    assert_eq!(engine.step_count(), 2);
    assert!(space.time() >= 2e-3);
}

#[test]
fn test_run_stops_on_error() {
    let mut engine = get_engine(TIME_INTEGRATION_CONFIG, ENGINE_CONFIG);
    let mut space = get_space(get_mesh(BOX_CONFIG), BoundaryMap::new(), |x| {
        pulse(x, DVec3::splat(0.5), DVec3::ZERO)
    });
    assert!(matches!(
        engine.run(&mut space),
        Err(HydroError::UnmappedBoundaryTag { .. })
    ));
    assert_eq!(engine.step_count(), 0);
    assert_eq!(space.time(), 0.);
}

#[test]
fn test_checkpoint_roundtrip() {
    let mut mesh = Mesh::rectangle([5, 4], [1., 1.]);
    mesh.perturb(0.2, 5);
    let mut space = get_space(mesh, symmetry_walls(2), |x| {
        pulse(x, DVec3::new(0.5, 0.5, 0.), DVec3::new(0.1, 0.2, 0.))
    });
    assert_eq!(
        space.restore_coordinates(),
        Err(HydroError::MissingCheckpoint("coordinates"))
    );

    let coordinates = space.mesh().coordinates().to_vec();
    let volumes: Vec<_> = (0..space.mesh().num_cells())
        .map(|cell| space.mesh().cell_volume(cell))
        .collect();
    let cells = space.cells().to_vec();
    space.save_coordinates();
    space.save_solution();

    // Immediate restore
    space.restore_coordinates().unwrap();
    assert_eq!(space.mesh().coordinates(), &coordinates[..]);

    // Restore after a full stage
    space.evaluate_corner_coef().unwrap();
    space.evaluate_nodal_state().unwrap();
    space.evaluate_forces();
    space.evaluate_time_step().unwrap();
    space.move_mesh(1.);
    space.apply_update(1.).unwrap();
    assert_ne!(space.mesh().coordinates(), &coordinates[..]);

    space.restore_coordinates().unwrap();
    space.restore_solution().unwrap();
    assert_eq!(space.mesh().coordinates(), &coordinates[..]);
    for (cell_idx, (cell, saved)) in space.cells().iter().zip(cells.iter()).enumerate() {
        assert_eq!(space.mesh().cell_volume(cell_idx), volumes[cell_idx]);
        assert_eq!(cell.velocity, saved.velocity);
        assert_eq!(cell.internal_energy, saved.internal_energy);
        assert_eq!(cell.mass, saved.mass);
    }
}

#[test]
fn test_time_step_grows_geometrically() {
    let mut space = get_space(Mesh::rectangle([4, 4], [1., 1.]), symmetry_walls(2), |x| {
        pulse(x, DVec3::new(0.5, 0.5, 0.), DVec3::ZERO)
    });
    let constants = get_time_constants(TIME_INTEGRATION_CONFIG);
    space.set_time_step(1e-6);
    let mut previous = space.time_step();
    for _ in 0..3 {
        space.evaluate_corner_coef().unwrap();
        space.evaluate_nodal_state().unwrap();
        space.evaluate_forces();
        space.evaluate_time_step().unwrap();
        assert_approx_eq!(f64, space.time_step(), constants.growth * previous);
        assert_eq!(space.limiter().map(|limiter| limiter.label()), Some("growth"));
        previous = space.time_step();
    }
}

#[test]
fn test_constant_state_needs_a_drive() {
    let constant = ics_from_preset("constant").unwrap();

    let mut engine = get_engine(TIME_INTEGRATION_CONFIG, ENGINE_CONFIG);
    let mut space = get_space(Mesh::rectangle([4, 4], [1., 1.]), symmetry_walls(2), constant);
    assert!(matches!(
        engine.run(&mut space),
        Err(HydroError::DegenerateTimeStep { .. })
    ));
    assert_eq!(engine.step_count(), 0);

    // Overpressure on the -x wall sets the gas in motion
    let mut boundaries = symmetry_walls(2);
    boundaries.insert(1, BoundaryCondition::Pressure(Prescribed::Constant(2.)));
    let mut engine = get_engine(TIME_INTEGRATION_CONFIG, ENGINE_CONFIG);
    let mut space = get_space(Mesh::rectangle([4, 4], [1., 1.]), boundaries, constant);
    engine.run(&mut space).unwrap();
    assert_eq!(engine.step_count(), 5);
    assert!(space.conservation_totals().momentum().x > 0.);
    assert_approx_eq!(f64, space.conservation_totals().mass(), 1., epsilon = 1e-14);
}
