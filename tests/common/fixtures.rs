/// Hook document as libvirt writes it for a routed network
pub const NETWORK_XML: &str = r#"<hookData>
  <network>
    <name>net-a</name>
    <forward mode='route'/>
    <bridge name='virbr1' stp='on' delay='0'/>
    <ip address='192.168.100.1' netmask='255.255.255.0'/>
  </network>
</hookData>"#;

pub const EMPTY_FORWARD_CHAIN: &str = "Chain FORWARD (policy ACCEPT 0 packets, 0 bytes)
 pkts bytes target     prot opt in     out     source               destination";

/// FORWARD chain that already accepts 10.1.2.3 on virbr1
pub const CONFIGURED_FORWARD_CHAIN: &str = "Chain FORWARD (policy ACCEPT 0 packets, 0 bytes)
 pkts bytes target     prot opt in     out     source               destination
   12  1008 ACCEPT     all  --  virbr1 *       10.1.2.3             0.0.0.0/0
   12  1008 ACCEPT     all  --  *      virbr1  0.0.0.0/0            10.1.2.3
    0     0 REJECT     all  --  *      virbr1  0.0.0.0/0            0.0.0.0/0            reject-with icmp-port-unreachable";
