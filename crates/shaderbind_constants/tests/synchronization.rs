use bytemuck::{Pod, Zeroable};
use shaderbind_constants::{DeviceCall, HeadlessDevice, ShaderProgram, SyncSettings};
use shaderbind_hal::{
    sampler::TextureUnit,
    shader::ShaderStage,
    uniforms::{UniformKind, UniformSlot, Uniforms},
    Device, Matrix4, Vector3, Vector4,
};

const PROGRAM: u32 = 1;
const OTHER: u32 = 2;
const HANDLE_A: u32 = 10;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn matrix_and_texture() -> ShaderProgram<HeadlessDevice> {
    ShaderProgram::link(
        PROGRAM,
        &[UniformSlot::constant("transform", UniformKind::Matrix44, 1, 0)],
        &[UniformSlot::texture("diffuse", TextureUnit::new(0, 0))],
        SyncSettings::default(),
    )
    .unwrap()
}

#[test]
fn matrix_and_texture_follow_the_bound_program() {
    init_logger();

    let mut program = matrix_and_texture();
    let mut device = HeadlessDevice::new();
    device.use_program(Some(PROGRAM));
    device.clear();

    program
        .get_mut("transform")
        .unwrap()
        .set_value(&device, Matrix4::<f32>::identity(), 0);

    let identity: Vec<u8> = bytemuck::bytes_of(&Matrix4::<f32>::identity()).to_vec();
    let vertex = program.table(ShaderStage::Vertex);
    assert_eq!(vertex.bytes(), identity.as_slice());
    assert_eq!(vertex.bytes().len(), 64);
    assert!(vertex.is_dirty());

    program.get_mut("diffuse").unwrap().set_texture(&mut device, HANDLE_A);
    assert_eq!(device.texture_binds(), vec![(TextureUnit::new(0, 0), HANDLE_A)]);

    device.use_program(Some(OTHER));
    device.clear();

    program
        .get_mut("transform")
        .unwrap()
        .set_value(&device, Matrix4::<f32>::zeros(), 0);
    assert_eq!(program.table(ShaderStage::Vertex).bytes(), identity.as_slice());
    assert!(device.texture_binds().is_empty());

    device.use_program(Some(PROGRAM));
    program.get_mut("diffuse").unwrap().update(&mut device);
    assert_eq!(device.texture_binds(), vec![(TextureUnit::new(0, 0), HANDLE_A)]);
}

#[test]
fn cache_always_reflects_last_write() {
    init_logger();

    let mut program = matrix_and_texture();
    let mut device = HeadlessDevice::new();

    let translation = Matrix4::<f32>::new_translation(&Vector3::new(1.0, 2.0, 3.0));
    for bound in [None, Some(OTHER), Some(PROGRAM)] {
        device.use_program(bound);
        program
            .get_mut("transform")
            .unwrap()
            .set_value(&device, translation, 0);
        assert_eq!(program.get("transform").unwrap().value(0), Some(translation));
    }
}

#[test]
fn frame_loop_sends_one_buffer_per_draw() {
    init_logger();

    let mut program = matrix_and_texture();
    let mut device = HeadlessDevice::new();

    program.activate(&mut device);
    program.flush(&mut device);
    device.clear();

    for frame in 0..3 {
        let mut transform = program.get_mut("transform").unwrap();
        transform.set_value(&device, Matrix4::new_scaling(frame as f32), 0);
        transform.set_value(&device, Matrix4::new_scaling(frame as f32 + 1.0), 0);

        assert!(program.flush(&mut device));
    }

    let uploads = device.constant_uploads();
    assert_eq!(uploads.len(), 3);
    for (frame, (stage, bytes)) in uploads.into_iter().enumerate() {
        assert_eq!(stage, ShaderStage::Vertex);
        assert_eq!(bytes, bytemuck::bytes_of(&Matrix4::<f32>::new_scaling(frame as f32 + 1.0)));
    }
}

#[test]
fn switching_programs_reasserts_textures() {
    init_logger();

    let mut first = matrix_and_texture();
    let mut second = ShaderProgram::<HeadlessDevice>::link(
        OTHER,
        &[],
        &[UniformSlot::texture("diffuse", TextureUnit::new(0, 0))],
        SyncSettings::default(),
    )
    .unwrap();
    let mut device = HeadlessDevice::new();

    first.activate(&mut device);
    first.get_mut("diffuse").unwrap().set_texture(&mut device, 1);
    second.get_mut("diffuse").unwrap().set_texture(&mut device, 2);

    second.activate(&mut device);
    first.activate(&mut device);

    let unit = TextureUnit::new(0, 0);
    assert_eq!(device.texture_binds(), vec![(unit, 1), (unit, 2), (unit, 1)]);
    assert_eq!(
        device.calls().iter().filter(|call| matches!(call, DeviceCall::UseProgram(_))).count(),
        3
    );
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Uniforms)]
struct Material {
    #[uniforms(name = "albedo")]
    color: Vector4<f32>,
    roughness: f32,
    __padding: [f32; 3],
    palette: [Vector4<f32>; 2],
}

#[test]
fn derived_layout_drives_table_and_writes() {
    init_logger();

    assert_eq!(
        Material::LAYOUT,
        &[
            UniformSlot::constant("albedo", UniformKind::Float4, 1, 0),
            UniformSlot::constant("roughness", UniformKind::Float, 1, 16),
            UniformSlot::constant("palette", UniformKind::Float4, 2, 32),
        ]
    );

    let mut program = ShaderProgram::<HeadlessDevice>::link(
        PROGRAM,
        &[],
        Material::LAYOUT,
        SyncSettings::default(),
    )
    .unwrap();
    let mut device = HeadlessDevice::new();
    program.activate(&mut device);

    let material = Material {
        color: Vector4::new(1.0, 0.5, 0.25, 1.0),
        roughness: 0.75,
        __padding: [0.0; 3],
        palette: [Vector4::repeat(0.1), Vector4::repeat(0.2)],
    };
    program.table_mut(ShaderStage::Fragment).write(&device, &material);

    let fragment = program.table(ShaderStage::Fragment);
    assert_eq!(fragment.bytes(), bytemuck::bytes_of(&material));
    assert_eq!(fragment.get("roughness").unwrap().value(0), Some(0.75f32));

    assert!(program.flush(&mut device));
    assert_eq!(
        device.constant_uploads(),
        vec![(ShaderStage::Fragment, bytemuck::bytes_of(&material))]
    );
}
