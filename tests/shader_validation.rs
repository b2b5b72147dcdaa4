//! Parse and validate the WGSL programs with naga, and check that their
//! interfaces agree with the Rust-side layouts.

use boids::particle::{Particle, SimParams};
use boids::shader::{
    COMPUTE_ENTRY, COMPUTE_SOURCE, FRAGMENT_ENTRY, SPRITE_SOURCE, VERTEX_ENTRY, WORKGROUP_SIZE,
};
use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, Module, ShaderStage, StorageAccess, TypeInner};

fn validated(source: &str) -> Module {
    let module = match wgsl::parse_str(source) {
        Ok(module) => module,
        Err(err) => panic!("{}", err.emit_to_string(source)),
    };
    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    if let Err(err) = validator.validate(&module) {
        panic!("{}", err.emit_to_string(source));
    }
    module
}

fn struct_members(module: &Module, name: &str) -> (Vec<(String, u32)>, u32) {
    module
        .types
        .iter()
        .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(ty_name), TypeInner::Struct { members, span }) if ty_name == name => Some((
                members
                    .iter()
                    .map(|m| (m.name.clone().unwrap_or_default(), m.offset))
                    .collect(),
                *span,
            )),
            _ => None,
        })
        .unwrap_or_else(|| panic!("struct {} not found", name))
}

fn global_at(module: &Module, binding: u32) -> (String, AddressSpace) {
    module
        .global_variables
        .iter()
        .find_map(|(_, var)| match &var.binding {
            Some(rb) if rb.group == 0 && rb.binding == binding => {
                Some((var.name.clone().unwrap_or_default(), var.space))
            }
            _ => None,
        })
        .unwrap_or_else(|| panic!("nothing bound at @binding({})", binding))
}

#[test]
fn test_compute_shader_validates() {
    validated(COMPUTE_SOURCE);
}

#[test]
fn test_sprite_shader_validates() {
    validated(SPRITE_SOURCE);
}

#[test]
fn test_compute_entry_point_and_workgroup_size() {
    let module = validated(COMPUTE_SOURCE);
    let entry = module
        .entry_points
        .iter()
        .find(|e| e.name == COMPUTE_ENTRY)
        .expect("compute entry point");

    assert_eq!(entry.stage, ShaderStage::Compute);
    assert_eq!(entry.workgroup_size, [WORKGROUP_SIZE, 1, 1]);
}

#[test]
fn test_sim_params_layout_matches() {
    let module = validated(COMPUTE_SOURCE);
    let (members, span) = struct_members(&module, "SimParams");

    let expected = [
        ("delta_t", 0),
        ("rule1_distance", 4),
        ("rule2_distance", 8),
        ("rule3_distance", 12),
        ("rule1_scale", 16),
        ("rule2_scale", 20),
        ("rule3_scale", 24),
        ("particle_count", 28),
    ];
    let members: Vec<(&str, u32)> = members.iter().map(|(n, o)| (n.as_str(), *o)).collect();
    assert_eq!(members, expected);
    assert_eq!(span as usize, std::mem::size_of::<SimParams>());
}

#[test]
fn test_particle_layout_matches() {
    let module = validated(COMPUTE_SOURCE);
    let (members, span) = struct_members(&module, "Particle");

    assert_eq!(
        members,
        vec![("position".to_string(), 0), ("velocity".to_string(), 8)]
    );
    assert_eq!(span as usize, std::mem::size_of::<Particle>());
}

#[test]
fn test_compute_bindings() {
    let module = validated(COMPUTE_SOURCE);

    let (name, space) = global_at(&module, 0);
    assert_eq!(name, "params");
    assert_eq!(space, AddressSpace::Uniform);

    let (name, space) = global_at(&module, 1);
    assert_eq!(name, "particles_src");
    match space {
        AddressSpace::Storage { access } => {
            assert!(access.contains(StorageAccess::LOAD));
            assert!(!access.contains(StorageAccess::STORE));
        }
        other => panic!("source buffer in {:?}", other),
    }

    let (name, space) = global_at(&module, 2);
    assert_eq!(name, "particles_dst");
    match space {
        AddressSpace::Storage { access } => {
            assert!(access.contains(StorageAccess::LOAD | StorageAccess::STORE));
        }
        other => panic!("destination buffer in {:?}", other),
    }
}

#[test]
fn test_sprite_vertex_inputs() {
    let module = validated(SPRITE_SOURCE);
    let vertex = module
        .entry_points
        .iter()
        .find(|e| e.name == VERTEX_ENTRY)
        .expect("vertex entry point");
    assert_eq!(vertex.stage, ShaderStage::Vertex);

    let inputs: Vec<(String, u32)> = vertex
        .function
        .arguments
        .iter()
        .filter_map(|arg| match arg.binding {
            Some(Binding::Location { location, .. }) => {
                Some((arg.name.clone().unwrap_or_default(), location))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        inputs,
        vec![
            ("particle_position".to_string(), 0),
            ("particle_velocity".to_string(), 1),
            ("sprite_position".to_string(), 2),
        ]
    );

    let fragment = module
        .entry_points
        .iter()
        .find(|e| e.name == FRAGMENT_ENTRY)
        .expect("fragment entry point");
    assert_eq!(fragment.stage, ShaderStage::Fragment);
}
