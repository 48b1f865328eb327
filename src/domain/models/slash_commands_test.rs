use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_plain_message() {
    let text = "hello there";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_valid_prefix() {
    let text = "/q";
    assert!(SlashCommand::parse(text).is_some());
}

#[test]
fn it_parse_with_trailing_text() {
    let cmd = SlashCommand::parse("/open now please").unwrap();
    assert!(cmd.is_open());
}

#[test]
fn it_is_short_quit() {
    let cmd = SlashCommand::parse("/q").unwrap();
    assert!(cmd.is_quit());
}

#[test]
fn it_is_quit() {
    let cmd = SlashCommand::parse("/quit").unwrap();
    assert!(cmd.is_quit());
}

#[test]
fn it_is_exit() {
    let cmd = SlashCommand::parse("/exit").unwrap();
    assert!(cmd.is_quit());
}

#[test]
fn it_is_not_quit() {
    let cmd = SlashCommand::parse("/open").unwrap();
    assert!(!cmd.is_quit());
}

#[test]
fn it_is_short_open() {
    let cmd = SlashCommand::parse("/o").unwrap();
    assert!(cmd.is_open());
}

#[test]
fn it_is_open() {
    let cmd = SlashCommand::parse("/open").unwrap();
    assert!(cmd.is_open());
}

#[test]
fn it_is_close() {
    let cmd = SlashCommand::parse("/close").unwrap();
    assert!(cmd.is_close());
}

#[test]
fn it_is_not_close() {
    let cmd = SlashCommand::parse("/open").unwrap();
    assert!(!cmd.is_close());
}

#[test]
fn it_is_short_status() {
    let cmd = SlashCommand::parse("/s").unwrap();
    assert!(cmd.is_status());
}

#[test]
fn it_is_status() {
    let cmd = SlashCommand::parse("/status").unwrap();
    assert!(cmd.is_status());
}

#[test]
fn it_is_short_agent() {
    let cmd = SlashCommand::parse("/a").unwrap();
    assert!(cmd.is_agent());
}

#[test]
fn it_is_agent() {
    let cmd = SlashCommand::parse("/agent").unwrap();
    assert!(cmd.is_agent());
}

#[test]
fn it_is_short_help() {
    let cmd = SlashCommand::parse("/h").unwrap();
    assert!(cmd.is_help());
}

#[test]
fn it_is_help() {
    let cmd = SlashCommand::parse("/help").unwrap();
    assert!(cmd.is_help());
}
