use dlstream_frame::FrameReader;
use tracing::info;

use crate::cmd::{open_source, FramesArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{
    frame_line, frame_row, frame_wire, new_table, print_json, print_raw, FrameOutput,
    OutputFormat, FRAME_HEADER, FRAME_SCHEMA,
};

pub fn run(args: FramesArgs, format: OutputFormat) -> CliResult<i32> {
    let source = open_source(&args.input)?;
    let mut reader = FrameReader::new(source);
    let mut table = matches!(format, OutputFormat::Table).then(|| new_table(FRAME_HEADER.to_vec()));

    let mut index = 0usize;
    let mut shown = 0usize;
    let result = loop {
        let message = match reader.read_message() {
            Ok(Some(message)) => message,
            Ok(None) => break Ok(()),
            Err(err) => break Err(frame_error("read failed", err)),
        };
        let frame = FrameOutput::new(index, &message);
        index += 1;

        if let Some(channels) = &args.channels {
            if !channels.contains(&frame.channel) {
                continue;
            }
        }

        match format {
            OutputFormat::Json => print_json(FRAME_SCHEMA, &frame),
            OutputFormat::Table => {
                if let Some(table) = table.as_mut() {
                    table.add_row(frame_row(&frame));
                }
            }
            OutputFormat::Pretty => println!("{}", frame_line(&frame)),
            OutputFormat::Raw => print_raw(&frame_wire(&message)),
        }

        shown += 1;
        if args.count.is_some_and(|limit| shown >= limit) {
            break Ok(());
        }
    };

    if let Some(table) = table {
        println!("{table}");
    }

    let stats = reader.stats();
    info!(
        messages = stats.messages,
        shown,
        discarded_bytes = stats.discarded_bytes,
        syncs = stats.syncs,
        "frame scan finished"
    );

    result.map(|()| SUCCESS)
}
