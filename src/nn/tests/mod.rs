mod graph_basic;
mod layer;
mod node_conv2d;
