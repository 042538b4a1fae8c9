mod test_ping_pong;
mod test_unicast_miss_is_dropped;
