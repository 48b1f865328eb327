#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let cmd = SlashCommand {
            command: text.trim().split(' ').collect::<Vec<&str>>()[0].to_string(),
        };

        if cmd.is_quit()
            || cmd.is_open()
            || cmd.is_close()
            || cmd.is_status()
            || cmd.is_agent()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_open(&self) -> bool {
        return ["/o", "/open"].contains(&self.command.as_str());
    }

    pub fn is_close(&self) -> bool {
        return ["/close"].contains(&self.command.as_str());
    }

    pub fn is_status(&self) -> bool {
        return ["/s", "/status"].contains(&self.command.as_str());
    }

    pub fn is_agent(&self) -> bool {
        return ["/a", "/agent"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }
}
