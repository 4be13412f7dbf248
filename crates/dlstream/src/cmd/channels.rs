use dlstream_frame::ChannelTable;

use crate::cmd::{raw_unsupported, ChannelsArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{new_table, print_json, ChannelOutput, OutputFormat, CHANNEL_SCHEMA};

pub fn run(args: ChannelsArgs, format: OutputFormat) -> CliResult<i32> {
    let table = ChannelTable::standard();
    let entries: Vec<ChannelOutput> = table
        .iter()
        .filter(|(channel, _)| !args.inputs || channel.is_frequency() || channel.is_analog())
        .map(|(channel, length)| ChannelOutput::new(channel, length))
        .collect();

    match format {
        OutputFormat::Json => {
            for entry in &entries {
                print_json(CHANNEL_SCHEMA, entry);
            }
        }
        OutputFormat::Table => {
            let mut out = new_table(vec!["CHANNEL", "NAME", "LENGTH", "PAYLOAD"]);
            for entry in &entries {
                out.add_row(vec![
                    entry.channel.to_string(),
                    entry.name.to_string(),
                    entry.length.to_string(),
                    entry.payload_length.to_string(),
                ]);
            }
            println!("{out}");
        }
        OutputFormat::Pretty => {
            for entry in &entries {
                println!("{:>3}  {:<32} {:>3} bytes", entry.channel, entry.name, entry.length);
            }
        }
        OutputFormat::Raw => return Err(raw_unsupported("channels")),
    }

    Ok(SUCCESS)
}
