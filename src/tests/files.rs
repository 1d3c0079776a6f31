use std::fs;

use crate::{
    compat::CompatModes,
    device::DevicePath,
    options::{
        files::{self, find_title_config},
        Argument, ArgumentList,
    },
    settings::{Mode, Settings},
    title::Title,
};

use super::Console;

fn game() -> Title {
    Title::from_path("SLUS_209.46", "mass:/DVD/Game.iso".parse().unwrap())
}

fn names(list: &ArgumentList) -> Vec<&str> {
    list.iter().map(|a| a.name.as_str()).collect()
}

#[test]
fn title_name_comes_from_image_file() {
    let title = game();
    assert_eq!(title.name, "Game");
    assert_eq!(title.path.config_dir().unwrap().to_string(), "mass:/config");
}

#[test]
fn title_config_is_merged_over_global() {
    let console = Console::new();
    console.write("mass", "config/global.yaml", "gc: 3\nlogo:\nmt: dvd\n");
    console.write("mass", "config/Game.yaml", "$mt:\ndbc:\n");

    let list = files::load_launch_arguments(&console.settings, &game());

    assert_eq!(names(&list), ["gc", "mt", "dbc", "logo"]);
    let mt = list.find("mt").unwrap();
    assert_eq!((mt.value.as_str(), mt.disabled, mt.global), ("dvd", true, true));
    assert!(!list.find("dbc").unwrap().global);
    assert!(list.find("logo").unwrap().global);
    assert_eq!(list.flatten(), ["-gc=3", "-dbc", "-logo"]);
}

#[test]
fn global_config_alone_gets_empty_compat_entry() {
    let console = Console::new();
    console.write("mass", "config/global.yaml", "logo:\n");

    let list = files::load_launch_arguments(&console.settings, &game());

    assert_eq!(names(&list), ["gc", "logo"]);
    let compat = list.compat().unwrap();
    assert!(compat.disabled);
    assert_eq!(compat.compat_modes(), CompatModes::EMPTY);
    assert_eq!(list.flatten(), ["-logo"]);
}

#[test]
fn no_config_at_all_still_launches() {
    let console = Console::new();
    let list = files::load_launch_arguments(&console.settings, &game());
    assert_eq!(names(&list), ["gc"]);
    assert!(list.flatten().is_empty());
}

#[test]
fn title_name_wins_over_title_id() {
    let console = Console::new();
    console.write("mass", "config/SLUS_209.46.yaml", "by_id:\n");
    let by_name = console.write("mass", "config/Game.yaml", "by_name:\n");

    assert_eq!(find_title_config(&console.settings, &game()).unwrap(), Some(by_name));
    let list = files::title_arguments(&console.settings, &game()).unwrap();
    assert_eq!(names(&list), ["by_name"]);
}

#[test]
fn title_id_is_used_without_name_match() {
    let console = Console::new();
    let by_id = console.write("mass", "config/SLUS_209.46.yaml", "by_id:\n");
    console.write("mass", "config/Other.yaml", "other:\n");

    assert_eq!(find_title_config(&console.settings, &game()).unwrap(), Some(by_id));
}

#[test]
fn saved_config_keeps_title_entries_and_disabled_globals() {
    let console = Console::new();
    let mut list: ArgumentList = [
        Argument { global: true, ..Argument::new("logo", "") },
        Argument { global: true, ..Argument::disabled("mt", "dvd") },
        Argument::new("dbc", ""),
    ].into_iter().collect();
    list.set_compat_modes(CompatModes::IOP_ACCURATE_READS | CompatModes::EE_UNHOOK_SYSCALLS);

    files::save_title_arguments(&console.settings, &game(), &list).unwrap();

    let saved = fs::read_to_string(console.path("mass", "config/Game.yaml")).unwrap();
    assert_eq!(saved, "gc: 13\n$mt:\ndbc: \n");

    console.write("mass", "config/global.yaml", "logo:\nmt: dvd\n");
    let reloaded = files::load_launch_arguments(&console.settings, &game());
    assert_eq!(reloaded.flatten(), ["-gc=13", "-dbc", "-logo"]);
}

#[test]
fn last_title_round_trips() {
    let console = Console::new();
    assert_eq!(files::last_launched_title(&console.settings).unwrap(), None);

    let path: DevicePath = "mass:/DVD/Game.iso".parse().unwrap();
    files::update_last_launched_title(&console.settings, &path).unwrap();

    assert_eq!(fs::read_to_string(console.path("mass", "config/lastTitle.txt")).unwrap(), "mass:/DVD/Game.iso");
    assert_eq!(files::last_launched_title(&console.settings).unwrap(), Some(path));
}

#[test]
fn settings_come_from_options_file() {
    let console = Console::new();
    fs::write(console.settings.elf_dir.join("nhddl.yaml"), "mode: usb\n480p:\n$udpbd_ip: 10.0.0.2\n").unwrap();

    let settings = Settings::load(console.settings.mounts.clone(), &console.settings.elf_dir);

    assert_eq!(settings.mode, Mode::Usb);
    assert!(settings.video_480p);
    assert_eq!(settings.udpbd_ip, None);
}

#[test]
fn udpbd_ip_falls_back_to_ipconfig() {
    let console = Console::new();
    fs::write(console.settings.elf_dir.join("nhddl.yaml"), "mode: udpbd\n").unwrap();
    console.write("mc0", "SYS-CONF/IPCONFIG.DAT", "192.168.1.10 255.255.255.0 192.168.1.1");

    let settings = Settings::load(console.settings.mounts.clone(), &console.settings.elf_dir);

    assert_eq!(settings.mode, Mode::Udpbd);
    assert_eq!(settings.udpbd_ip.as_deref(), Some("192.168.1.10"));
}

#[test]
fn missing_options_file_keeps_defaults() {
    let console = Console::new();
    let settings = Settings::load(console.settings.mounts.clone(), &console.settings.elf_dir);
    assert_eq!(settings.mode, Mode::Ata);
    assert!(!settings.video_480p);
    assert_eq!(settings.history_capacity, 21);
}

#[test]
fn unterminated_blank_override_is_dropped() {
    let console = Console::new();
    console.write("mass", "config/global.yaml", "mt: dvd\n");
    console.write("mass", "config/Game.yaml", "dbc:\n$mt:");

    let list = files::load_launch_arguments(&console.settings, &game());

    let mt = list.find("mt").unwrap();
    assert!(!mt.disabled);
    assert_eq!(list.flatten(), ["-dbc", "-mt=dvd"]);
}

#[test]
fn settings_print_as_options_file() {
    let console = Console::new();
    let settings = Settings {
        mode: Mode::Udpbd,
        video_480p: false,
        udpbd_ip: Some("10.0.0.2".to_owned()),
        ..console.settings.clone()
    };

    let printed = settings.to_string();
    assert_eq!(printed, "mode: udpbd\n$480p: \nudpbd_ip: 10.0.0.2\n");

    fs::write(console.settings.elf_dir.join("nhddl.yaml"), &printed).unwrap();
    let reloaded = Settings::load(console.settings.mounts.clone(), &console.settings.elf_dir);
    assert_eq!(reloaded.mode, Mode::Udpbd);
    assert!(!reloaded.video_480p);
    assert_eq!(reloaded.udpbd_ip.as_deref(), Some("10.0.0.2"));
}
