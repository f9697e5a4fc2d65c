use tokio::time::Instant;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use rusty_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Replies with Pong! and the round trip time.",
    category: "utility",
    usage: "!ping",
};

/// Reply, then edit the reply with how long the send took.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let started = Instant::now();
    let reply = http
        .create_message(msg.channel_id)
        .content("Pong!")
        .await?
        .model()
        .await?;

    let out = format!("Pong! `{} ms`", started.elapsed().as_millis());
    http.update_message(reply.channel_id, reply.id)
        .content(Some(out.as_str()))
        .await?;

    Ok(())
}
