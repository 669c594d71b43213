mod common;

use common::{build_ok, generate_module};
use ffigen::types::{ArrayLen, CType, Primitive};

const JOYSTICK: &str = r#"
_AL_MAX_JOYSTICK_AXES:#define _AL_MAX_JOYSTICK_AXES 3
ALLEGRO_MAX_JOYSTICK_STICKS:#define ALLEGRO_MAX_JOYSTICK_STICKS 16
ALLEGRO_MAX_JOYSTICK_BUTTONS:#define ALLEGRO_MAX_JOYSTICK_BUTTONS 32
ALLEGRO_JOYSTICK_STATE:typedef struct ALLEGRO_JOYSTICK_STATE { struct { float axis[ALLEGRO_MAX_JOYSTICK_AXES]; } stick[ALLEGRO_MAX_JOYSTICK_STICKS]; int button[ALLEGRO_MAX_JOYSTICK_BUTTONS]; } ALLEGRO_JOYSTICK_STATE;
ALLEGRO_MAX_JOYSTICK_AXES:#define ALLEGRO_MAX_JOYSTICK_AXES 3
ALLEGRO_JOYSTICK:typedef struct ALLEGRO_JOYSTICK ALLEGRO_JOYSTICK;
al_get_joystick_state():void al_get_joystick_state(ALLEGRO_JOYSTICK *joy, ALLEGRO_JOYSTICK_STATE *ret_state);
al_get_joystick_name():const char *al_get_joystick_name(ALLEGRO_JOYSTICK *joy);
"#;

#[test]
fn test_joystick_state_layout() {
    let table = build_ok(JOYSTICK);
    let fields = table.fields_of("ALLEGRO_JOYSTICK_STATE").unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "stick");
    assert_eq!(
        fields[0].ty,
        CType::array(
            CType::array(CType::Primitive(Primitive::Float), ArrayLen::Fixed(3)),
            ArrayLen::Fixed(16)
        )
    );
    assert_eq!(fields[1].ty.to_string(), "c_int * 32");
    // Excluded by prefix.
    assert_eq!(table.get_constant("_AL_MAX_JOYSTICK_AXES"), None);
}

#[test]
fn test_joystick_module() {
    let module = generate_module(JOYSTICK);
    assert!(module.contains("ALLEGRO_JOYSTICK_STATE._fields_ = [\n    (\"stick\", (c_float * 3) * 16),\n"));
    assert!(module.contains(
        "al_get_joystick_state = _dll(\"al_get_joystick_state\", None, [LP_ALLEGRO_JOYSTICK, LP_ALLEGRO_JOYSTICK_STATE])\n"
    ));
    assert!(module.contains("al_get_joystick_name = _dll(\"al_get_joystick_name\", _AL_UTF8String, [LP_ALLEGRO_JOYSTICK])\n"));
}

#[test]
fn test_generation_is_deterministic() {
    assert_eq!(generate_module(JOYSTICK), generate_module(JOYSTICK));
}

#[test]
fn test_two_pass_ordering() {
    // Every aggregate is referenced before the line declaring it.
    let source = r#"
al_wait_for_event():void al_wait_for_event(ALLEGRO_EVENT_QUEUE *queue, ALLEGRO_EVENT *ret_event);
ALLEGRO_EVENT:typedef union ALLEGRO_EVENT { ALLEGRO_EVENT_TYPE type; ALLEGRO_ANY_EVENT any; ALLEGRO_TIMER_EVENT timer; } ALLEGRO_EVENT;
ALLEGRO_ANY_EVENT:typedef struct ALLEGRO_ANY_EVENT { ALLEGRO_EVENT_TYPE type; double timestamp; } ALLEGRO_ANY_EVENT;
ALLEGRO_TIMER_EVENT:typedef struct ALLEGRO_TIMER_EVENT { ALLEGRO_EVENT_TYPE type; int64_t count; double error; } ALLEGRO_TIMER_EVENT;
ALLEGRO_EVENT_QUEUE:typedef struct ALLEGRO_EVENT_QUEUE ALLEGRO_EVENT_QUEUE;
ALLEGRO_EVENT_TYPE:typedef unsigned int ALLEGRO_EVENT_TYPE;
"#;
    let table = build_ok(source);
    let event: Vec<String> = table
        .fields_of("ALLEGRO_EVENT")
        .unwrap()
        .iter()
        .map(|f| format!("{}: {}", f.name, f.ty))
        .collect();
    assert_eq!(
        event,
        ["type: c_uint", "any: ALLEGRO_ANY_EVENT", "timer: ALLEGRO_TIMER_EVENT"]
    );
    let wait = table.get_function("al_wait_for_event").unwrap();
    assert_eq!(
        wait.params.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
        ["LP_ALLEGRO_EVENT_QUEUE", "LP_ALLEGRO_EVENT"]
    );
}

#[test]
fn test_embedded_struct_fields_assigned_first() {
    let source = r#"
ALLEGRO_A:typedef struct ALLEGRO_A { ALLEGRO_COLOR c; } ALLEGRO_A;
ALLEGRO_COLOR:typedef struct ALLEGRO_COLOR { float r, g, b, a; } ALLEGRO_COLOR;
"#;
    let module = generate_module(source);
    let color = module.find("ALLEGRO_COLOR._fields_ = [").unwrap();
    let outer = module.find("ALLEGRO_A._fields_ = [").unwrap();
    assert!(color < outer);
}
