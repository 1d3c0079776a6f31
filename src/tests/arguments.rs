use crate::{
    compat::{CompatModes, COMPAT_MODES_ARG},
    options::{Argument, ArgumentList},
};

fn global(mut arg: Argument) -> Argument {
    arg.global = true;
    arg
}

#[test]
fn disabled_empty_entry_takes_secondary_value_and_stays_disabled() {
    let mut primary: ArgumentList = [Argument::disabled("x", "")].into_iter().collect();
    let secondary: ArgumentList = [global(Argument::new("x", "y"))].into_iter().collect();

    primary.merge(&secondary);

    assert_eq!(primary.len(), 1);
    let x = primary.get(0).unwrap();
    assert_eq!(x.value, "y");
    assert!(x.disabled);
    assert!(x.global);
}

#[test]
fn primary_wins_on_collision() {
    let mut primary: ArgumentList = [Argument::new("x", "1"), Argument::disabled("y", "keep")].into_iter().collect();
    let secondary: ArgumentList = [Argument::new("x", "2"), Argument::new("y", "other")].into_iter().collect();

    primary.merge(&secondary);

    assert_eq!(primary.find("x"), Some(&Argument::new("x", "1")));
    assert_eq!(primary.find("y"), Some(&Argument::disabled("y", "keep")));
}

#[test]
fn missing_entries_are_copied_with_their_flags() {
    let mut primary: ArgumentList = [Argument::new("a", "")].into_iter().collect();
    let secondary: ArgumentList = [
        global(Argument::disabled("b", "2")),
        global(Argument::new(COMPAT_MODES_ARG, "3")),
    ].into_iter().collect();

    primary.merge(&secondary);

    let names: Vec<_> = primary.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, [COMPAT_MODES_ARG, "a", "b"]);
    assert_eq!(primary.find("b"), Some(&global(Argument::disabled("b", "2"))));
}

#[test]
fn disabled_compat_entry_is_not_overridden() {
    let mut primary = ArgumentList::new();
    primary.ensure_compat_mode(CompatModes::EMPTY);
    let secondary: ArgumentList = [global(Argument::new(COMPAT_MODES_ARG, "1"))].into_iter().collect();

    primary.merge(&secondary);

    let compat = primary.compat().unwrap();
    assert!(compat.disabled);
    assert_eq!(compat.value, "");
}

#[test]
fn flatten_skips_disabled_and_empty_compat() {
    let mut list: ArgumentList = [
        Argument::new("logo", ""),
        Argument::disabled("dbc", ""),
        Argument::new("mt", "dvd"),
    ].into_iter().collect();
    list.ensure_compat_mode(CompatModes::EMPTY);
    // A compat entry enabled by hand but left empty still produces nothing.
    list.get_mut(0).unwrap().disabled = false;

    assert_eq!(list.flatten(), ["-logo", "-mt=dvd"]);

    list.set_compat_modes(CompatModes::IOP_ACCURATE_READS | CompatModes::EE_UNHOOK_SYSCALLS);
    assert_eq!(list.flatten(), ["-gc=13", "-logo", "-mt=dvd"]);
}

#[test]
fn ensure_compat_mode_keeps_existing_head() {
    let mut list: ArgumentList = [Argument::new("logo", ""), Argument::new(COMPAT_MODES_ARG, "2")].into_iter().collect();
    list.ensure_compat_mode(CompatModes::EMPTY);

    assert_eq!(list.len(), 2);
    assert_eq!(list.compat_modes(), CompatModes::IOP_SYNC_READS);
}

#[test]
fn default_compat_mode_is_inserted_at_head() {
    let mut list: ArgumentList = [Argument::new("logo", "")].into_iter().collect();
    list.ensure_compat_mode(CompatModes::DISABLE_BUILTIN_MODES);

    let head = list.get(0).unwrap();
    assert!(head.is_compat());
    assert_eq!(head.value, "0");
    assert!(!head.disabled);
    assert!(!head.global);
}

#[test]
fn editing_compat_modes_takes_ownership_from_global() {
    let mut list: ArgumentList = [global(Argument::new(COMPAT_MODES_ARG, "1"))].into_iter().collect();

    list.set_compat_modes(CompatModes::EMPTY);

    let head = list.get(0).unwrap();
    assert_eq!(head.value, "");
    assert!(head.disabled);
    assert!(!head.global);
}

#[test]
fn toggle_flips_disabled() {
    let mut list: ArgumentList = [Argument::new("logo", "")].into_iter().collect();
    assert_eq!(list.toggle(0), Some(true));
    assert_eq!(list.toggle(0), Some(false));
    assert_eq!(list.toggle(5), None);
}
